use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::QuestionId;

/// Answer value as captured from the respondent.
///
/// The variant is interpreted through the owning question's type: text types
/// read `Text`, numeric reads `Number` (or parses `Text`), single choice and file
/// upload read `Text`, and multi choice reads `Choices`. Any other JSON shape
/// is carried through untouched as `Other`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Choices(Vec<String>),
    Other(serde_json::Value),
}

impl ResponseValue {
    /// Absent-equivalent for the required check: null, empty string, or no choices.
    pub fn is_blank(&self) -> bool {
        match self {
            ResponseValue::Null => true,
            ResponseValue::Text(text) => text.is_empty(),
            ResponseValue::Choices(choices) => choices.is_empty(),
            ResponseValue::Bool(_) | ResponseValue::Number(_) | ResponseValue::Other(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric reading of the value; text is parsed after trimming.
    ///
    /// Parsing is strict: the whole text must be a number, so `"12 years"` has
    /// no numeric reading. Non-finite values such as `"inf"` are rejected too.
    pub fn as_number(&self) -> Option<f64> {
        let number = match self {
            ResponseValue::Number(number) => *number,
            ResponseValue::Text(text) => text.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        number.is_finite().then_some(number)
    }

    /// Strict equality: variants must agree, so `Number(5.0)` never matches `Text("5")`.
    /// Choice lists are compared as sets.
    pub fn matches(&self, expected: &ResponseValue) -> bool {
        match (self, expected) {
            (ResponseValue::Choices(actual), ResponseValue::Choices(expected)) => {
                let mut actual: Vec<&String> = actual.iter().collect();
                let mut expected: Vec<&String> = expected.iter().collect();
                actual.sort();
                actual.dedup();
                expected.sort();
                expected.dedup();
                actual == expected
            }
            (actual, expected) => actual == expected,
        }
    }
}

impl From<&str> for ResponseValue {
    fn from(value: &str) -> Self {
        ResponseValue::Text(value.to_string())
    }
}

impl From<String> for ResponseValue {
    fn from(value: String) -> Self {
        ResponseValue::Text(value)
    }
}

impl From<f64> for ResponseValue {
    fn from(value: f64) -> Self {
        ResponseValue::Number(value)
    }
}

impl From<bool> for ResponseValue {
    fn from(value: bool) -> Self {
        ResponseValue::Bool(value)
    }
}

impl From<Vec<String>> for ResponseValue {
    fn from(value: Vec<String>) -> Self {
        ResponseValue::Choices(value)
    }
}

/// Answers keyed by question id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseMap(BTreeMap<QuestionId, ResponseValue>);

impl ResponseMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Option<&ResponseValue> {
        self.0.get(question_id)
    }

    pub fn set(
        &mut self,
        question_id: QuestionId,
        value: impl Into<ResponseValue>,
    ) -> Option<ResponseValue> {
        self.0.insert(question_id, value.into())
    }

    pub fn with(mut self, question_id: &QuestionId, value: impl Into<ResponseValue>) -> Self {
        self.set(question_id.clone(), value);
        self
    }

    pub fn remove(&mut self, question_id: &str) -> Option<ResponseValue> {
        self.0.remove(question_id)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &ResponseValue)> {
        self.0.iter()
    }
}

impl FromIterator<(QuestionId, ResponseValue)> for ResponseMap {
    fn from_iter<T: IntoIterator<Item = (QuestionId, ResponseValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
