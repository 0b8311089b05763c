use super::common::*;
use crate::assessments::domain::{Question, QuestionKind, Section, SectionId};
use crate::assessments::responses::{ResponseMap, ResponseValue};
use crate::assessments::validation::{validate, ValidationIssue};

fn numeric_section(min: Option<f64>, max: Option<f64>) -> Vec<Section> {
    vec![Section::new(SectionId::from("n"), "Numbers").with_questions(vec![Question::new(
        qid("value"),
        QuestionKind::Numeric,
        "Value",
    )
    .with_range(min, max)])]
}

#[test]
fn hidden_required_question_is_not_validated() {
    let assessment = screening_assessment();
    let errors = assessment.validate(&ResponseMap::new().with(&qid("q1"), "No"));

    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn visible_required_question_reports_missing_answer() {
    let assessment = screening_assessment();
    let errors = assessment.validate(&ResponseMap::new().with(&qid("q1"), "Yes"));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors.message("q2").as_deref(), Some("This field is required"));
}

#[test]
fn required_check_treats_blank_values_as_missing() {
    let sections = vec![experience_section()];
    let blanks = [
        ResponseValue::Null,
        ResponseValue::from(""),
        ResponseValue::Choices(Vec::new()),
    ];

    for blank in blanks {
        let responses = ResponseMap::new()
            .with(&qid("name"), blank.clone())
            .with(&qid("stack"), blank.clone());
        let errors = validate(&sections, &responses);
        assert_eq!(errors.get("name"), Some(&ValidationIssue::Required), "{blank:?}");
        assert_eq!(errors.get("stack"), Some(&ValidationIssue::Required), "{blank:?}");
    }
}

#[test]
fn optional_questions_accept_missing_answers() {
    let sections = vec![experience_section()];
    let responses = ResponseMap::new()
        .with(&qid("name"), "Ann")
        .with(&qid("stack"), vec!["Rust".to_string()]);

    assert!(validate(&sections, &responses).is_empty());
}

#[test]
fn numeric_range_bounds() {
    let sections = numeric_section(Some(10.0), Some(20.0));

    let low = validate(&sections, &ResponseMap::new().with(&qid("value"), 5.0));
    assert_eq!(low.message("value").as_deref(), Some("Value must be at least 10"));

    let high = validate(&sections, &ResponseMap::new().with(&qid("value"), 25.0));
    assert_eq!(high.message("value").as_deref(), Some("Value must be at most 20"));

    let within = validate(&sections, &ResponseMap::new().with(&qid("value"), 15.0));
    assert!(within.is_empty());
}

#[test]
fn numeric_text_input_is_parsed_before_range_check() {
    let sections = numeric_section(Some(0.0), Some(50.0));

    let parsed = validate(&sections, &ResponseMap::new().with(&qid("value"), "51"));
    assert_eq!(parsed.get("value"), Some(&ValidationIssue::AboveMaximum { max: 50.0 }));

    let unparseable = validate(&sections, &ResponseMap::new().with(&qid("value"), "lots"));
    assert!(unparseable.is_empty());
}

#[test]
fn absent_optional_numeric_is_not_range_checked() {
    let sections = numeric_section(Some(10.0), Some(20.0));
    assert!(validate(&sections, &ResponseMap::new()).is_empty());
}

#[test]
fn fractional_bounds_render_without_padding() {
    let sections = numeric_section(Some(2.5), None);
    let errors = validate(&sections, &ResponseMap::new().with(&qid("value"), 1.0));
    assert_eq!(errors.message("value").as_deref(), Some("Value must be at least 2.5"));
}

#[test]
fn max_length_applies_to_text_types_only() {
    let sections = vec![experience_section()];
    let base = ResponseMap::new().with(&qid("stack"), vec!["Go".to_string()]);

    let long = validate(&sections, &base.clone().with(&qid("name"), "abcdef"));
    assert_eq!(
        long.message("name").as_deref(),
        Some("Maximum length is 5 characters")
    );

    let short = validate(&sections, &base.clone().with(&qid("name"), "abc"));
    assert!(short.is_empty());

    let mut numeric = Question::new(qid("n"), QuestionKind::Numeric, "N");
    numeric.max_length = Some(1);
    let ignored = vec![Section::new(SectionId::from("x"), "X").with_questions(vec![numeric])];
    assert!(validate(&ignored, &ResponseMap::new().with(&qid("n"), "12345")).is_empty());
}

#[test]
fn max_length_counts_characters_not_bytes() {
    let sections = vec![experience_section()];
    let responses = ResponseMap::new()
        .with(&qid("name"), "Zoë✓!")
        .with(&qid("stack"), vec!["Go".to_string()]);

    assert!(validate(&sections, &responses).is_empty());
}

#[test]
fn zero_max_length_disables_the_check() {
    let sections = vec![Section::new(SectionId::from("t"), "T").with_questions(vec![
        Question::new(qid("bio"), QuestionKind::LongText, "Bio").with_max_length(0),
    ])];
    assert!(validate(&sections, &ResponseMap::new().with(&qid("bio"), "anything")).is_empty());
}

#[test]
fn required_error_wins_over_type_specific_rules() {
    let sections = vec![Section::new(SectionId::from("n"), "N").with_questions(vec![
        Question::new(qid("value"), QuestionKind::Numeric, "Value")
            .required()
            .with_range(Some(1.0), None),
    ])];

    let errors = validate(&sections, &ResponseMap::new().with(&qid("value"), ResponseValue::Null));
    assert_eq!(errors.get("value"), Some(&ValidationIssue::Required));
}

#[test]
fn inapplicable_constraints_are_ignored() {
    let mut choice = Question::new(qid("pick"), QuestionKind::SingleChoice, "Pick")
        .with_options(["A", "B"])
        .with_range(Some(100.0), Some(200.0));
    choice.max_length = Some(1);
    let sections = vec![Section::new(SectionId::from("c"), "C").with_questions(vec![choice])];

    assert!(validate(&sections, &ResponseMap::new().with(&qid("pick"), "A")).is_empty());
}

#[test]
fn validation_is_repeatable() {
    let assessment = assessment_with(vec![screening_section(), experience_section()]);
    let responses = ResponseMap::new()
        .with(&qid("q1"), "Yes")
        .with(&qid("name"), "too long name")
        .with(&qid("years"), 3.0);

    let first = assessment.validate(&responses);
    let second = assessment.validate(&responses);
    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
}

#[test]
fn errors_serialize_as_message_map() {
    let assessment = screening_assessment();
    let errors = assessment.validate(&ResponseMap::new());

    let json = serde_json::to_value(&errors).expect("serializes");
    assert_eq!(json, serde_json::json!({ "q1": "This field is required" }));
}

#[test]
fn range_is_only_checked_on_numeric_questions() {
    for kind in QuestionKind::ordered() {
        let sections = vec![Section::new(SectionId::from("s"), "S").with_questions(vec![
            Question::new(qid("value"), kind, "Value").with_range(Some(10.0), Some(20.0)),
        ])];
        let errors = validate(&sections, &ResponseMap::new().with(&qid("value"), "42"));

        if kind.is_numeric() {
            assert_eq!(
                errors.get("value"),
                Some(&ValidationIssue::AboveMaximum { max: 20.0 })
            );
        } else {
            assert!(errors.is_empty(), "{kind:?} should ignore min/max");
        }
    }
}
