use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::document::AssessmentDraft;
use super::domain::{
    Assessment, AssessmentResponse, CandidateId, JobId, Section, SubmissionReceipt,
};
use super::repository::{AssessmentStore, StoreError};
use super::responses::ResponseMap;
use super::validation::ValidationErrors;

/// Service composing the store with the builder and submission pipeline.
pub struct AssessmentService<S> {
    store: Arc<S>,
}

impl<S> AssessmentService<S>
where
    S: AssessmentStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn load(&self, job_id: JobId) -> Result<Option<Assessment>, StoreError> {
        self.store.get_assessment(job_id)
    }

    /// Draft for the builder: the saved assessment, or an empty one that
    /// becomes real once a section is added and the draft is saved.
    pub fn open_draft(&self, job_id: JobId) -> Result<AssessmentDraft, StoreError> {
        Ok(self
            .store
            .get_assessment(job_id)?
            .map(AssessmentDraft::from)
            .unwrap_or_else(|| AssessmentDraft::new(job_id)))
    }

    pub fn save(&self, draft: &AssessmentDraft) -> Result<Assessment, StoreError> {
        let saved = self
            .store
            .save_assessment(draft.job_id, draft.sections().to_vec())?;
        info!(job_id = %saved.job_id, sections = saved.sections.len(), "assessment saved");
        Ok(saved)
    }

    /// Save raw sections received from a client, normalised through a draft.
    pub fn save_sections(
        &self,
        job_id: JobId,
        sections: Vec<Section>,
    ) -> Result<Assessment, StoreError> {
        self.save(&AssessmentDraft::from_sections(job_id, sections))
    }

    pub fn delete(&self, job_id: JobId) -> Result<bool, StoreError> {
        let removed = self.store.delete_assessment(job_id)?;
        if !removed {
            warn!(%job_id, "delete targeted job without an assessment");
        }
        Ok(removed)
    }

    /// Validate then persist a candidate's responses.
    ///
    /// Nothing is written when validation fails. Store failures are returned
    /// as-is without retrying; re-submitting is up to the caller.
    pub fn submit(
        &self,
        assessment: &Assessment,
        candidate_id: CandidateId,
        job_id: JobId,
        responses: ResponseMap,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let errors = assessment.validate(&responses);
        if !errors.is_empty() {
            debug!(%job_id, %candidate_id, invalid = errors.len(), "submission rejected");
            return Err(SubmissionError::ValidationFailed(errors));
        }

        let receipt = self.store.save_response(AssessmentResponse {
            candidate_id,
            job_id,
            responses,
            submitted_at: Utc::now(),
        })?;

        info!(%job_id, %candidate_id, submitted_at = %receipt.submitted_at, "assessment response stored");
        Ok(receipt)
    }

    /// `submit` against the stored assessment for `job_id`.
    pub fn submit_for_job(
        &self,
        candidate_id: CandidateId,
        job_id: JobId,
        responses: ResponseMap,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let assessment = self
            .store
            .get_assessment(job_id)?
            .ok_or(SubmissionError::UnknownAssessment(job_id))?;
        self.submit(&assessment, candidate_id, job_id, responses)
    }

    pub fn response(
        &self,
        candidate_id: CandidateId,
        job_id: JobId,
    ) -> Result<Option<AssessmentResponse>, StoreError> {
        self.store.get_response(candidate_id, job_id)
    }
}

/// Outcome of a rejected submission.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission has {} invalid field(s)", .0.len())]
    ValidationFailed(ValidationErrors),
    #[error("failed to persist submission: {0}")]
    PersistenceFailed(#[from] StoreError),
    #[error("no assessment exists for job {0}")]
    UnknownAssessment(JobId),
}
