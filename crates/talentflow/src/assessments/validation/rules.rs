use super::super::domain::Question;
use super::super::responses::ResponseValue;
use super::ValidationIssue;

/// First failing rule for a visible question, if any.
pub(crate) fn check_question(
    question: &Question,
    response: Option<&ResponseValue>,
) -> Option<ValidationIssue> {
    required(question, response)
        .or_else(|| numeric_range(question, response))
        .or_else(|| max_length(question, response))
}

fn required(question: &Question, response: Option<&ResponseValue>) -> Option<ValidationIssue> {
    if !question.required {
        return None;
    }
    match response {
        None => Some(ValidationIssue::Required),
        Some(value) if value.is_blank() => Some(ValidationIssue::Required),
        Some(_) => None,
    }
}

fn numeric_range(question: &Question, response: Option<&ResponseValue>) -> Option<ValidationIssue> {
    if !question.kind.is_numeric() {
        return None;
    }
    // Unparseable input is left alone, matching a NaN comparison.
    let value = response?.as_number()?;

    if let Some(min) = question.min {
        if value < min {
            return Some(ValidationIssue::BelowMinimum { min });
        }
    }
    if let Some(max) = question.max {
        if value > max {
            return Some(ValidationIssue::AboveMaximum { max });
        }
    }
    None
}

fn max_length(question: &Question, response: Option<&ResponseValue>) -> Option<ValidationIssue> {
    if !question.kind.is_text() {
        return None;
    }
    // Zero means "no limit" in the builder.
    let limit = question.max_length.filter(|limit| *limit > 0)?;
    let text = response?.as_text().filter(|text| !text.is_empty())?;

    if text.chars().count() > limit as usize {
        Some(ValidationIssue::TooLong { max_length: limit })
    } else {
        None
    }
}
