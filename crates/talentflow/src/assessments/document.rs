//! Editable assessment document used by the builder.
//!
//! Every edit is lenient: targeting an unknown section or question, or moving
//! from an out-of-range index, logs a warning and leaves the document as it
//! was. Removing a question never touches conditionals that point at it; those
//! become dangling and the visibility rules treat them as always visible.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{
    Assessment, Conditional, JobId, Question, QuestionKind, Section, SectionId,
};
use super::responses::ResponseMap;
use super::validation::{validate, ValidationErrors};
use super::visibility::VisibilityScope;

/// In-memory, unsaved assessment for one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentDraft {
    pub job_id: JobId,
    sections: Vec<Section>,
}

impl AssessmentDraft {
    pub fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            sections: Vec::new(),
        }
    }

    /// Wrap existing sections, dropping any conditional that references its own question.
    pub fn from_sections(job_id: JobId, mut sections: Vec<Section>) -> Self {
        for question in sections
            .iter_mut()
            .flat_map(|section| section.questions.iter_mut())
        {
            drop_self_reference(question);
        }
        Self { job_id, sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// An assessment comes into existence with its first section.
    pub fn is_initialized(&self) -> bool {
        !self.sections.is_empty()
    }

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.id.as_str() == section_id)
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.sections
            .iter()
            .find_map(|section| section.question(question_id))
    }

    /// Questions a given question may depend on: every other question in the document.
    pub fn conditional_targets(&self, question_id: &str) -> Vec<&Question> {
        self.sections
            .iter()
            .flat_map(|section| section.questions.iter())
            .filter(|question| question.id.as_str() != question_id)
            .collect()
    }

    /// Append a new, empty section.
    pub fn add_section(
        &mut self,
        id: SectionId,
        title: impl Into<String>,
        description: Option<String>,
    ) -> bool {
        if self.section(id.as_str()).is_some() {
            warn!(section_id = %id, "ignoring duplicate section id");
            return false;
        }
        self.sections.push(Section {
            id,
            title: title.into(),
            description,
            questions: Vec::new(),
        });
        true
    }

    pub fn update_section(&mut self, section_id: &str, patch: SectionPatch) -> bool {
        let Some(section) = self.section_mut(section_id) else {
            return false;
        };
        patch.apply(section);
        true
    }

    pub fn remove_section(&mut self, section_id: &str) -> bool {
        let before = self.sections.len();
        self.sections
            .retain(|section| section.id.as_str() != section_id);
        let removed = self.sections.len() != before;
        if !removed {
            warn!(%section_id, "remove targeted unknown section");
        }
        removed
    }

    pub fn reorder_sections(&mut self, from: usize, to: usize) -> bool {
        let moved = move_item(&mut self.sections, from, to);
        if !moved {
            warn!(from, to, len = self.sections.len(), "section move out of range");
        }
        moved
    }

    pub fn add_question(&mut self, section_id: &str, mut question: Question) -> bool {
        if self.question(question.id.as_str()).is_some() {
            warn!(question_id = %question.id, "ignoring duplicate question id");
            return false;
        }
        let Some(section) = self.section_mut(section_id) else {
            return false;
        };
        drop_self_reference(&mut question);
        section.questions.push(question);
        true
    }

    pub fn update_question(
        &mut self,
        section_id: &str,
        question_id: &str,
        patch: QuestionPatch,
    ) -> bool {
        let Some(question) = self.question_mut(section_id, question_id) else {
            return false;
        };
        patch.apply(question);
        drop_self_reference(question);
        true
    }

    pub fn remove_question(&mut self, section_id: &str, question_id: &str) -> bool {
        let Some(section) = self.section_mut(section_id) else {
            return false;
        };
        let before = section.questions.len();
        section
            .questions
            .retain(|question| question.id.as_str() != question_id);
        let removed = section.questions.len() != before;
        if !removed {
            warn!(%section_id, %question_id, "remove targeted unknown question");
        }
        removed
    }

    pub fn reorder_questions(&mut self, section_id: &str, from: usize, to: usize) -> bool {
        let Some(section) = self.section_mut(section_id) else {
            return false;
        };
        let moved = move_item(&mut section.questions, from, to);
        if !moved {
            warn!(%section_id, from, to, "question move out of range");
        }
        moved
    }

    pub fn visibility(&self) -> VisibilityScope<'_> {
        VisibilityScope::new(&self.sections)
    }

    /// Preview-time validation against the unsaved document.
    pub fn validate(&self, responses: &ResponseMap) -> ValidationErrors {
        validate(&self.sections, responses)
    }

    fn section_mut(&mut self, section_id: &str) -> Option<&mut Section> {
        let found = self
            .sections
            .iter_mut()
            .find(|section| section.id.as_str() == section_id);
        if found.is_none() {
            warn!(%section_id, "edit targeted unknown section");
        }
        found
    }

    fn question_mut(&mut self, section_id: &str, question_id: &str) -> Option<&mut Question> {
        let section = self.section_mut(section_id)?;
        let found = section
            .questions
            .iter_mut()
            .find(|question| question.id.as_str() == question_id);
        if found.is_none() {
            warn!(%section_id, %question_id, "edit targeted unknown question");
        }
        found
    }
}

impl From<Assessment> for AssessmentDraft {
    fn from(assessment: Assessment) -> Self {
        Self::from_sections(assessment.job_id, assessment.sections)
    }
}

fn drop_self_reference(question: &mut Question) {
    if question.references_itself() {
        warn!(question_id = %question.id, "dropping conditional that references its own question");
        question.conditional = None;
    }
}

/// Stable move: remove at `from`, insert at `to` (clamped to the end).
fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() {
        return false;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
    true
}

/// Partial section update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
}

impl SectionPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    fn apply(self, section: &mut Section) {
        if let Some(title) = self.title {
            section.title = title;
        }
        if let Some(description) = self.description {
            section.description = description;
        }
    }
}

/// Partial question update. Outer `None` leaves a field untouched; for optional
/// fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionPatch {
    pub kind: Option<QuestionKind>,
    pub label: Option<String>,
    pub required: Option<bool>,
    pub max_length: Option<Option<u32>>,
    pub min: Option<Option<f64>>,
    pub max: Option<Option<f64>>,
    pub options: Option<Option<Vec<String>>>,
    pub conditional: Option<Option<Conditional>>,
}

impl QuestionPatch {
    pub fn kind(mut self, kind: QuestionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn max_length(mut self, max_length: Option<u32>) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn options(mut self, options: Option<Vec<String>>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn conditional(mut self, conditional: Option<Conditional>) -> Self {
        self.conditional = Some(conditional);
        self
    }

    fn apply(self, question: &mut Question) {
        if let Some(kind) = self.kind {
            question.kind = kind;
        }
        if let Some(label) = self.label {
            question.label = label;
        }
        if let Some(required) = self.required {
            question.required = required;
        }
        if let Some(max_length) = self.max_length {
            question.max_length = max_length;
        }
        if let Some(min) = self.min {
            question.min = min;
        }
        if let Some(max) = self.max {
            question.max = max;
        }
        if let Some(options) = self.options {
            question.options = options;
        }
        if let Some(conditional) = self.conditional {
            question.conditional = conditional;
        }
    }
}
