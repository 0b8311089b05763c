use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::domain::{
    Assessment, AssessmentResponse, CandidateId, JobId, Section, SubmissionReceipt,
};
use super::repository::{AssessmentStore, StoreError};

/// Process-local store backing the service binary, demos and tests.
#[derive(Default, Clone)]
pub struct InMemoryAssessmentStore {
    assessments: Arc<Mutex<HashMap<JobId, Assessment>>>,
    responses: Arc<Mutex<HashMap<(CandidateId, JobId), AssessmentResponse>>>,
}

impl InMemoryAssessmentStore {
    pub fn response_count(&self) -> usize {
        self.responses.lock().expect("response mutex poisoned").len()
    }
}

impl AssessmentStore for InMemoryAssessmentStore {
    fn get_assessment(&self, job_id: JobId) -> Result<Option<Assessment>, StoreError> {
        let guard = self.assessments.lock().expect("assessment mutex poisoned");
        Ok(guard.get(&job_id).cloned())
    }

    fn save_assessment(
        &self,
        job_id: JobId,
        sections: Vec<Section>,
    ) -> Result<Assessment, StoreError> {
        let assessment = Assessment {
            job_id,
            sections,
            updated_at: Utc::now(),
        };
        let mut guard = self.assessments.lock().expect("assessment mutex poisoned");
        guard.insert(job_id, assessment.clone());
        Ok(assessment)
    }

    fn delete_assessment(&self, job_id: JobId) -> Result<bool, StoreError> {
        let mut guard = self.assessments.lock().expect("assessment mutex poisoned");
        Ok(guard.remove(&job_id).is_some())
    }

    fn save_response(
        &self,
        response: AssessmentResponse,
    ) -> Result<SubmissionReceipt, StoreError> {
        let receipt = SubmissionReceipt {
            submitted_at: response.submitted_at,
        };
        let mut guard = self.responses.lock().expect("response mutex poisoned");
        guard.insert((response.candidate_id, response.job_id), response);
        Ok(receipt)
    }

    fn get_response(
        &self,
        candidate_id: CandidateId,
        job_id: JobId,
    ) -> Result<Option<AssessmentResponse>, StoreError> {
        let guard = self.responses.lock().expect("response mutex poisoned");
        Ok(guard.get(&(candidate_id, job_id)).cloned())
    }
}
