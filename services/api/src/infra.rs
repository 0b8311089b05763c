use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use metrics_exporter_prometheus::PrometheusHandle;
use rand::Rng;
use talentflow::assessments::{
    Assessment, AssessmentResponse, AssessmentStore, CandidateId, JobId, Question, QuestionId,
    QuestionKind, Section, SectionId, StoreError, SubmissionReceipt,
};
use talentflow::config::SimulationConfig;
use tracing::{debug, warn};

/// Jobs that receive the sample assessment on startup.
pub(crate) const SEEDED_JOBS: std::ops::RangeInclusive<u64> = 1..=5;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Store wrapper that fails writes at random, standing in for an unreliable backend.
#[derive(Clone)]
pub(crate) struct FlakyStore<S> {
    inner: S,
    failure_rate: f64,
}

impl<S> FlakyStore<S> {
    /// `failure_rate` must lie in `0.0..=1.0`; `SimulationConfig` guarantees it.
    pub(crate) fn new(inner: S, failure_rate: f64) -> Self {
        Self {
            inner,
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }

    fn roll(&self, operation: &'static str) -> Result<(), StoreError> {
        if self.failure_rate > 0.0 && rand::thread_rng().gen_bool(self.failure_rate) {
            warn!(operation, "injected store failure");
            return Err(StoreError::Unavailable(format!(
                "simulated failure during {operation}"
            )));
        }
        Ok(())
    }
}

impl<S> AssessmentStore for FlakyStore<S>
where
    S: AssessmentStore,
{
    fn get_assessment(&self, job_id: JobId) -> Result<Option<Assessment>, StoreError> {
        self.inner.get_assessment(job_id)
    }

    fn save_assessment(
        &self,
        job_id: JobId,
        sections: Vec<Section>,
    ) -> Result<Assessment, StoreError> {
        self.roll("save_assessment")?;
        self.inner.save_assessment(job_id, sections)
    }

    fn delete_assessment(&self, job_id: JobId) -> Result<bool, StoreError> {
        self.inner.delete_assessment(job_id)
    }

    fn save_response(
        &self,
        response: AssessmentResponse,
    ) -> Result<SubmissionReceipt, StoreError> {
        self.roll("save_response")?;
        self.inner.save_response(response)
    }

    fn get_response(
        &self,
        candidate_id: CandidateId,
        job_id: JobId,
    ) -> Result<Option<AssessmentResponse>, StoreError> {
        self.inner.get_response(candidate_id, job_id)
    }
}

/// Axum middleware delaying each request by a uniform draw from the configured range.
pub(crate) async fn simulate_latency(
    State(simulation): State<SimulationConfig>,
    request: Request,
    next: Next,
) -> Response {
    let delay = draw_latency(&simulation);
    if !delay.is_zero() {
        debug!(delay_ms = delay.as_millis() as u64, "simulating network latency");
        tokio::time::sleep(delay).await;
    }
    next.run(request).await
}

fn draw_latency(simulation: &SimulationConfig) -> Duration {
    let (min, max) = simulation.latency_range();
    if min >= max {
        return max;
    }
    rand::thread_rng().gen_range(min..=max)
}

/// Sample hiring assessment: personal details, experience with a follow-up
/// shown only to candidates who held a similar role, skills, and closing questions.
pub(crate) fn sample_sections() -> Vec<Section> {
    let similar_role = QuestionId::generate();

    vec![
        Section::new(SectionId::generate(), "Personal Information")
            .with_description("Please provide your basic information")
            .with_questions(vec![
                Question::new(QuestionId::generate(), QuestionKind::ShortText, "Full Name")
                    .required()
                    .with_max_length(100),
                Question::new(QuestionId::generate(), QuestionKind::ShortText, "Email Address")
                    .required()
                    .with_max_length(100),
                Question::new(QuestionId::generate(), QuestionKind::ShortText, "Phone Number")
                    .with_max_length(20),
            ]),
        Section::new(SectionId::generate(), "Professional Experience")
            .with_description("Tell us about your background")
            .with_questions(vec![
                Question::new(
                    QuestionId::generate(),
                    QuestionKind::Numeric,
                    "Years of Experience",
                )
                .required()
                .with_range(Some(0.0), Some(50.0)),
                Question::new(
                    similar_role.clone(),
                    QuestionKind::SingleChoice,
                    "Have you worked in a similar role before?",
                )
                .required()
                .with_options(["Yes", "No"]),
                Question::new(
                    QuestionId::generate(),
                    QuestionKind::LongText,
                    "Describe your most relevant experience",
                )
                .required()
                .with_max_length(1000)
                .shown_when(similar_role, "Yes"),
            ]),
        Section::new(SectionId::generate(), "Technical Assessment")
            .with_description("Evaluate your technical competencies")
            .with_questions(vec![
                Question::new(
                    QuestionId::generate(),
                    QuestionKind::MultiChoice,
                    "Which technologies are you proficient in?",
                )
                .required()
                .with_options([
                    "JavaScript",
                    "Python",
                    "Java",
                    "C++",
                    "Go",
                    "Rust",
                    "TypeScript",
                    "React",
                    "Node.js",
                ]),
                Question::new(
                    QuestionId::generate(),
                    QuestionKind::SingleChoice,
                    "Preferred work environment?",
                )
                .required()
                .with_options(["Remote", "Hybrid", "On-site"]),
                Question::new(
                    QuestionId::generate(),
                    QuestionKind::Numeric,
                    "Expected Salary (in thousands)",
                )
                .with_range(Some(0.0), Some(500.0)),
            ]),
        Section::new(SectionId::generate(), "Additional Information")
            .with_description("Final questions")
            .with_questions(vec![
                Question::new(
                    QuestionId::generate(),
                    QuestionKind::LongText,
                    "Why do you want to join our company?",
                )
                .required()
                .with_max_length(500),
                Question::new(
                    QuestionId::generate(),
                    QuestionKind::SingleChoice,
                    "Are you legally authorized to work in this country?",
                )
                .required()
                .with_options(["Yes", "No"]),
                Question::new(
                    QuestionId::generate(),
                    QuestionKind::FileUpload,
                    "Upload your resume (PDF)",
                ),
            ]),
    ]
}

/// Store the sample assessment for every seeded job, returning how many were written.
pub(crate) fn seed_assessments<S>(store: &S) -> Result<usize, StoreError>
where
    S: AssessmentStore,
{
    let mut seeded = 0;
    for job in SEEDED_JOBS {
        store.save_assessment(JobId(job), sample_sections())?;
        seeded += 1;
    }
    Ok(seeded)
}
