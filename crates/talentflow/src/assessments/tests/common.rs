use std::sync::atomic::{AtomicUsize, Ordering};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::assessments::domain::{
    Assessment, AssessmentResponse, CandidateId, JobId, Question, QuestionId, QuestionKind,
    Section, SectionId, SubmissionReceipt,
};
use crate::assessments::repository::{AssessmentStore, StoreError};

pub(super) const JOB: JobId = JobId(7);
pub(super) const CANDIDATE: CandidateId = CandidateId(42);

pub(super) fn qid(raw: &str) -> QuestionId {
    QuestionId::from(raw)
}

pub(super) fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

/// Q1 (single choice, required) gates Q2 (long text, required) on "Yes".
pub(super) fn screening_section() -> Section {
    Section::new(SectionId::from("screening"), "Screening").with_questions(vec![
        Question::new(qid("q1"), QuestionKind::SingleChoice, "Worked in a similar role?")
            .required()
            .with_options(["Yes", "No"]),
        Question::new(qid("q2"), QuestionKind::LongText, "Describe that role")
            .required()
            .shown_when(qid("q1"), "Yes"),
    ])
}

pub(super) fn experience_section() -> Section {
    Section::new(SectionId::from("experience"), "Experience")
        .with_description("Tell us about your background")
        .with_questions(vec![
            Question::new(qid("name"), QuestionKind::ShortText, "Nickname")
                .required()
                .with_max_length(5),
            Question::new(qid("years"), QuestionKind::Numeric, "Years of experience")
                .with_range(Some(10.0), Some(20.0)),
            Question::new(qid("stack"), QuestionKind::MultiChoice, "Languages")
                .required()
                .with_options(["Rust", "Go", "Python"]),
            Question::new(qid("resume"), QuestionKind::FileUpload, "Resume"),
        ])
}

pub(super) fn assessment_with(sections: Vec<Section>) -> Assessment {
    Assessment {
        job_id: JOB,
        sections,
        updated_at: fixed_time(),
    }
}

pub(super) fn screening_assessment() -> Assessment {
    assessment_with(vec![screening_section()])
}

/// Store whose writes always fail, as the flaky transport does.
#[derive(Default)]
pub(super) struct UnavailableStore {
    pub(super) assessment: Option<Assessment>,
    pub(super) response_writes: AtomicUsize,
}

impl UnavailableStore {
    pub(super) fn response_writes(&self) -> usize {
        self.response_writes.load(Ordering::SeqCst)
    }
}

impl AssessmentStore for UnavailableStore {
    fn get_assessment(&self, _job_id: JobId) -> Result<Option<Assessment>, StoreError> {
        Ok(self.assessment.clone())
    }

    fn save_assessment(
        &self,
        _job_id: JobId,
        _sections: Vec<Section>,
    ) -> Result<Assessment, StoreError> {
        Err(StoreError::Unavailable("network down".to_string()))
    }

    fn delete_assessment(&self, _job_id: JobId) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("network down".to_string()))
    }

    fn save_response(
        &self,
        _response: AssessmentResponse,
    ) -> Result<SubmissionReceipt, StoreError> {
        self.response_writes.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("network down".to_string()))
    }

    fn get_response(
        &self,
        _candidate_id: CandidateId,
        _job_id: JobId,
    ) -> Result<Option<AssessmentResponse>, StoreError> {
        Err(StoreError::Unavailable("network down".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is json")
}
