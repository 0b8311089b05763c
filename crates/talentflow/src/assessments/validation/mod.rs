mod rules;

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::domain::{Assessment, QuestionId, Section};
use super::responses::ResponseMap;
use super::visibility::VisibilityScope;

/// Field-level problem with a response. `Display` is the message shown to the respondent.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("This field is required")]
    Required,
    #[error("Value must be at least {min}")]
    BelowMinimum { min: f64 },
    #[error("Value must be at most {max}")]
    AboveMaximum { max: f64 },
    #[error("Maximum length is {max_length} characters")]
    TooLong { max_length: u32 },
}

/// At most one issue per question; an empty map means the responses are valid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationErrors(BTreeMap<QuestionId, ValidationIssue>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, question_id: &str) -> Option<&ValidationIssue> {
        self.0.get(question_id)
    }

    pub fn message(&self, question_id: &str) -> Option<String> {
        self.get(question_id).map(ToString::to_string)
    }

    /// Question id to display message, as sent over the wire.
    pub fn messages(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(id, issue)| (id.0.clone(), issue.to_string()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &ValidationIssue)> {
        self.0.iter()
    }

    pub(crate) fn remove(&mut self, question_id: &str) -> Option<ValidationIssue> {
        self.0.remove(question_id)
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, issue) in &self.0 {
            map.serialize_entry(id.as_str(), &issue.to_string())?;
        }
        map.end()
    }
}

/// Validate responses against the visible questions of `sections`.
///
/// Pure function of its inputs. Hidden questions are skipped entirely, so a
/// section whose questions are all hidden contributes nothing.
pub fn validate(sections: &[Section], responses: &ResponseMap) -> ValidationErrors {
    let scope = VisibilityScope::new(sections);
    let mut errors = BTreeMap::new();

    for section in sections {
        for question in scope.visible_questions(section, responses) {
            if let Some(issue) = rules::check_question(question, responses.get(question.id.as_str()))
            {
                errors.entry(question.id.clone()).or_insert(issue);
            }
        }
    }

    ValidationErrors(errors)
}

impl Assessment {
    pub fn validate(&self, responses: &ResponseMap) -> ValidationErrors {
        validate(&self.sections, responses)
    }
}
