use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub simulation: SimulationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let latency_min_ms = parse_millis("APP_SIM_LATENCY_MIN_MS", 200)?;
        let latency_max_ms = parse_millis("APP_SIM_LATENCY_MAX_MS", 1200)?;
        let failure_rate = match env::var("APP_SIM_FAILURE_RATE") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidFailureRate)?,
            Err(_) => SimulationConfig::DEFAULT_FAILURE_RATE,
        };
        let simulation = SimulationConfig::new(latency_min_ms, latency_max_ms, failure_rate)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            simulation,
        })
    }
}

fn parse_millis(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidLatency { key }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Artificial network conditions applied by the service binary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    latency_min: Duration,
    latency_max: Duration,
    failure_rate: f64,
}

impl SimulationConfig {
    pub const DEFAULT_FAILURE_RATE: f64 = 0.075;

    pub fn new(
        latency_min_ms: u64,
        latency_max_ms: u64,
        failure_rate: f64,
    ) -> Result<Self, ConfigError> {
        if latency_min_ms > latency_max_ms {
            return Err(ConfigError::InvertedLatencyRange {
                min_ms: latency_min_ms,
                max_ms: latency_max_ms,
            });
        }
        if !(0.0..=1.0).contains(&failure_rate) {
            return Err(ConfigError::InvalidFailureRate);
        }
        Ok(Self {
            latency_min: Duration::from_millis(latency_min_ms),
            latency_max: Duration::from_millis(latency_max_ms),
            failure_rate,
        })
    }

    /// No latency and no injected failures.
    pub fn disabled() -> Self {
        Self {
            latency_min: Duration::ZERO,
            latency_max: Duration::ZERO,
            failure_rate: 0.0,
        }
    }

    pub fn latency_range(&self) -> (Duration, Duration) {
        (self.latency_min, self.latency_max)
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }

    pub fn without_latency(self) -> Self {
        Self {
            latency_min: Duration::ZERO,
            latency_max: Duration::ZERO,
            ..self
        }
    }

    pub fn with_failure_rate(self, failure_rate: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&failure_rate) {
            return Err(ConfigError::InvalidFailureRate);
        }
        Ok(Self {
            failure_rate,
            ..self
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLatency { key: &'static str },
    InvertedLatencyRange { min_ms: u64, max_ms: u64 },
    InvalidFailureRate,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLatency { key } => {
                write!(f, "{key} must be a whole number of milliseconds")
            }
            ConfigError::InvertedLatencyRange { min_ms, max_ms } => write!(
                f,
                "simulated latency minimum ({min_ms}ms) exceeds maximum ({max_ms}ms)"
            ),
            ConfigError::InvalidFailureRate => {
                write!(f, "APP_SIM_FAILURE_RATE must be between 0 and 1")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidLatency { .. }
            | ConfigError::InvertedLatencyRange { .. }
            | ConfigError::InvalidFailureRate => None,
        }
    }
}
