use super::domain::{Assessment, CandidateId, QuestionId, SubmissionReceipt};
use super::repository::AssessmentStore;
use super::responses::{ResponseMap, ResponseValue};
use super::service::{AssessmentService, SubmissionError};
use super::validation::ValidationErrors;
use super::visibility::VisibleSection;

/// In-progress answers for one respondent, never persisted on their own.
#[derive(Debug, Clone, Default)]
pub struct FillSession {
    responses: ResponseMap,
    errors: ValidationErrors,
}

impl FillSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn responses(&self) -> &ResponseMap {
        &self.responses
    }

    /// Errors from the most recent validation or rejected submission.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Record an answer; a stale error on that question is cleared.
    pub fn set_response(&mut self, question_id: QuestionId, value: impl Into<ResponseValue>) {
        self.errors.remove(question_id.as_str());
        self.responses.set(question_id, value);
    }

    pub fn visible_sections<'a>(&self, assessment: &'a Assessment) -> Vec<VisibleSection<'a>> {
        assessment.visible_sections(&self.responses)
    }

    pub fn validate(&mut self, assessment: &Assessment) -> bool {
        self.errors = assessment.validate(&self.responses);
        self.errors.is_empty()
    }

    /// Submit a copy of the answers; they are cleared only once stored.
    pub fn submit<S>(
        &mut self,
        service: &AssessmentService<S>,
        assessment: &Assessment,
        candidate_id: CandidateId,
    ) -> Result<SubmissionReceipt, SubmissionError>
    where
        S: AssessmentStore + 'static,
    {
        match service.submit(
            assessment,
            candidate_id,
            assessment.job_id,
            self.responses.clone(),
        ) {
            Ok(receipt) => {
                self.responses.clear();
                self.errors.clear();
                Ok(receipt)
            }
            Err(SubmissionError::ValidationFailed(errors)) => {
                self.errors = errors.clone();
                Err(SubmissionError::ValidationFailed(errors))
            }
            Err(other) => Err(other),
        }
    }
}
