//! Assessment builder, conditional visibility, response validation and submission.

pub mod document;
pub mod domain;
pub mod memory;
pub mod repository;
pub mod responses;
pub mod router;
pub mod service;
pub mod session;
pub mod validation;
pub mod visibility;

#[cfg(test)]
mod tests;

pub use document::{AssessmentDraft, QuestionPatch, SectionPatch};
pub use domain::{
    Assessment, AssessmentResponse, CandidateId, Conditional, JobId, Question, QuestionId,
    QuestionKind, Section, SectionId, SubmissionReceipt,
};
pub use memory::InMemoryAssessmentStore;
pub use repository::{AssessmentStore, StoreError};
pub use responses::{ResponseMap, ResponseValue};
pub use router::{assessment_router, SaveAssessmentRequest, SubmitAssessmentRequest};
pub use service::{AssessmentService, SubmissionError};
pub use session::FillSession;
pub use validation::{validate, ValidationErrors, ValidationIssue};
pub use visibility::{conditional_satisfied, VisibilityScope, VisibleSection};
