use std::borrow::Borrow;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::responses::{ResponseMap, ResponseValue};

/// Identifier of the job an assessment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

/// Identifier of the candidate filling out an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub u64);

/// Opaque question identifier, stable across edits and never reused.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

/// Opaque section identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub String);

impl QuestionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl SectionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for QuestionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for SectionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Supported question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    ShortText,
    LongText,
    SingleChoice,
    MultiChoice,
    Numeric,
    FileUpload,
}

impl QuestionKind {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::ShortText,
            Self::LongText,
            Self::SingleChoice,
            Self::MultiChoice,
            Self::Numeric,
            Self::FileUpload,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ShortText => "Short Text",
            Self::LongText => "Long Text",
            Self::SingleChoice => "Single Choice",
            Self::MultiChoice => "Multiple Choice",
            Self::Numeric => "Numeric",
            Self::FileUpload => "File Upload",
        }
    }

    /// `maxLength` applies.
    pub const fn is_text(self) -> bool {
        matches!(self, Self::ShortText | Self::LongText)
    }

    /// `min` and `max` apply.
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Numeric)
    }
}

/// Visibility rule: show the owning question only when `question_id` was answered with `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conditional {
    #[serde(default)]
    pub question_id: Option<QuestionId>,
    #[serde(default)]
    pub value: ResponseValue,
}

impl Conditional {
    pub fn new(question_id: QuestionId, value: impl Into<ResponseValue>) -> Self {
        Self {
            question_id: Some(question_id),
            value: value.into(),
        }
    }

    /// Referenced question id, treating an empty string as unset.
    pub fn target(&self) -> Option<&QuestionId> {
        self.question_id
            .as_ref()
            .filter(|id| !id.as_str().is_empty())
    }
}

/// A single typed question.
///
/// Every constraint field is kept regardless of `kind`; the validator only
/// consults the ones that apply to the type, so switching a question's type in
/// the builder never discards or rejects previously entered constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional: Option<Conditional>,
}

impl Question {
    pub fn new(id: QuestionId, kind: QuestionKind, label: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            label: label.into(),
            required: false,
            max_length: None,
            min: None,
            max: None,
            options: None,
            conditional: None,
        }
    }

    /// Builder default: an optional short-text question with a fresh id.
    pub fn placeholder() -> Self {
        Self::new(QuestionId::generate(), QuestionKind::ShortText, "New Question")
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn shown_when(mut self, question_id: QuestionId, value: impl Into<ResponseValue>) -> Self {
        self.conditional = Some(Conditional::new(question_id, value));
        self
    }

    /// Id of the question this one depends on, if any.
    pub fn depends_on(&self) -> Option<&QuestionId> {
        self.conditional.as_ref().and_then(Conditional::target)
    }

    pub(crate) fn references_itself(&self) -> bool {
        self.depends_on() == Some(&self.id)
    }
}

/// Ordered group of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Section {
    pub fn new(id: SectionId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            questions: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_questions(mut self, questions: Vec<Question>) -> Self {
        self.questions = questions;
        self
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions
            .iter()
            .find(|question| question.id.as_str() == question_id)
    }
}

/// Persisted assessment for a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub job_id: JobId,
    pub sections: Vec<Section>,
    pub updated_at: DateTime<Utc>,
}

impl Assessment {
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections
            .iter()
            .flat_map(|section| section.questions.iter())
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions()
            .find(|question| question.id.as_str() == question_id)
    }
}

/// A candidate's final submission for a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResponse {
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    pub responses: ResponseMap,
    pub submitted_at: DateTime<Utc>,
}

/// Acknowledgement returned once a submission has been stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub submitted_at: DateTime<Utc>,
}
