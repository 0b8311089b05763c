use super::domain::{
    Assessment, AssessmentResponse, CandidateId, JobId, Section, SubmissionReceipt,
};

/// Persistence collaborator for assessments and submitted responses.
///
/// Both record kinds are upserts: one assessment per job, one response per
/// `(candidate, job)` pair. Implementations stamp `updated_at` themselves; the
/// submission timestamp arrives on the response record.
pub trait AssessmentStore: Send + Sync {
    fn get_assessment(&self, job_id: JobId) -> Result<Option<Assessment>, StoreError>;
    fn save_assessment(
        &self,
        job_id: JobId,
        sections: Vec<Section>,
    ) -> Result<Assessment, StoreError>;
    fn delete_assessment(&self, job_id: JobId) -> Result<bool, StoreError>;
    fn save_response(&self, response: AssessmentResponse)
        -> Result<SubmissionReceipt, StoreError>;
    fn get_response(
        &self,
        candidate_id: CandidateId,
        job_id: JobId,
    ) -> Result<Option<AssessmentResponse>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
