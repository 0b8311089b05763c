use crate::cli::ServeArgs;
use crate::infra::{seed_assessments, AppState, FlakyStore};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use talentflow::assessments::{AssessmentService, InMemoryAssessmentStore};
use talentflow::config::AppConfig;
use talentflow::error::AppError;
use talentflow::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if args.no_latency {
        config.simulation = config.simulation.without_latency();
    }
    if let Some(rate) = args.failure_rate {
        config.simulation = config.simulation.with_failure_rate(rate)?;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = InMemoryAssessmentStore::default();
    let seeded = seed_assessments(&store)?;
    let store = Arc::new(FlakyStore::new(store, config.simulation.failure_rate()));
    let service = Arc::new(AssessmentService::new(store));

    let app = with_assessment_routes(service, config.simulation)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    let (latency_min, latency_max) = config.simulation.latency_range();
    info!(
        ?config.environment,
        %addr,
        seeded,
        latency_min_ms = latency_min.as_millis() as u64,
        latency_max_ms = latency_max.as_millis() as u64,
        failure_rate = config.simulation.failure_rate(),
        "assessment service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
