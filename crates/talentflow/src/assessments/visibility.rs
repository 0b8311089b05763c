use std::collections::HashSet;

use serde::Serialize;

use super::domain::{Assessment, Conditional, Question, Section};
use super::responses::ResponseMap;

/// Bare comparison of a conditional against the response map.
///
/// A conditional without a target is always satisfied; otherwise the recorded
/// answer must strictly equal the expected value, and an unanswered target
/// never matches.
pub fn conditional_satisfied(conditional: &Conditional, responses: &ResponseMap) -> bool {
    match conditional.target() {
        None => true,
        Some(target) => responses
            .get(target.as_str())
            .is_some_and(|answer| answer.matches(&conditional.value)),
    }
}

/// Visibility evaluation scoped to one assessment's sections.
///
/// The scope knows which question ids exist so that conditionals pointing at
/// removed questions (or at the question itself) degrade to "always visible".
/// Nothing is cached between calls: every lookup reads the response map it is
/// given, so forward references resolve the same as backward ones.
#[derive(Debug, Clone)]
pub struct VisibilityScope<'a> {
    sections: &'a [Section],
    known: HashSet<&'a str>,
}

impl<'a> VisibilityScope<'a> {
    pub fn new(sections: &'a [Section]) -> Self {
        let known = sections
            .iter()
            .flat_map(|section| section.questions.iter())
            .map(|question| question.id.as_str())
            .collect();
        Self { sections, known }
    }

    pub fn is_visible(&self, question: &Question, responses: &ResponseMap) -> bool {
        let Some(conditional) = question.conditional.as_ref() else {
            return true;
        };
        let Some(target) = conditional.target() else {
            return true;
        };
        if target == &question.id || !self.known.contains(target.as_str()) {
            return true;
        }
        conditional_satisfied(conditional, responses)
    }

    pub fn visible_questions(
        &self,
        section: &'a Section,
        responses: &ResponseMap,
    ) -> Vec<&'a Question> {
        section
            .questions
            .iter()
            .filter(|question| self.is_visible(question, responses))
            .collect()
    }

    /// Sections with at least one visible question, in display order.
    pub fn visible_sections(&self, responses: &ResponseMap) -> Vec<VisibleSection<'a>> {
        self.sections
            .iter()
            .filter_map(|section| {
                let questions = self.visible_questions(section, responses);
                if questions.is_empty() {
                    None
                } else {
                    Some(VisibleSection { section, questions })
                }
            })
            .collect()
    }
}

/// A section as rendered for a given response map.
#[derive(Debug, Clone, Serialize)]
pub struct VisibleSection<'a> {
    pub section: &'a Section,
    pub questions: Vec<&'a Question>,
}

impl Assessment {
    pub fn visibility(&self) -> VisibilityScope<'_> {
        VisibilityScope::new(&self.sections)
    }

    pub fn is_visible(&self, question: &Question, responses: &ResponseMap) -> bool {
        self.visibility().is_visible(question, responses)
    }

    pub fn visible_sections(&self, responses: &ResponseMap) -> Vec<VisibleSection<'_>> {
        self.visibility().visible_sections(responses)
    }
}
