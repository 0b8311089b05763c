use crate::infra::{seed_assessments, FlakyStore, SEEDED_JOBS};
use clap::Args;
use std::sync::Arc;
use talentflow::assessments::{
    Assessment, AssessmentService, CandidateId, FillSession, InMemoryAssessmentStore, JobId,
    Question, QuestionKind, ResponseValue, SubmissionError,
};
use talentflow::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Seeded job whose assessment is filled out (1 to 5)
    #[arg(long, default_value_t = 1)]
    pub(crate) job: u64,
    /// Candidate the submission is recorded for
    #[arg(long, default_value_t = 1001)]
    pub(crate) candidate: u64,
    /// Answer single-choice questions with their last option, hiding conditional follow-ups
    #[arg(long)]
    pub(crate) decline: bool,
    /// Probability (0 to 1) that storing the submission fails
    #[arg(long, default_value_t = 0.0)]
    pub(crate) failure_rate: f64,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        job,
        candidate,
        decline,
        failure_rate,
    } = args;

    let store = InMemoryAssessmentStore::default();
    seed_assessments(&store)?;
    let flaky = Arc::new(FlakyStore::new(store.clone(), failure_rate));
    let service = AssessmentService::new(flaky);

    let Some(assessment) = service.load(JobId(job))? else {
        println!(
            "No assessment for job {job}; seeded jobs are {}..={}",
            SEEDED_JOBS.start(),
            SEEDED_JOBS.end()
        );
        return Ok(());
    };

    println!("Assessment demo for job {}", assessment.job_id);
    render_outline(&assessment);

    let mut session = FillSession::new();
    println!("\nSubmitting an empty form");
    if session.validate(&assessment) {
        println!("- No required questions");
    } else {
        for (question_id, issue) in session.errors().iter() {
            let label = assessment
                .question(question_id.as_str())
                .map_or(question_id.as_str(), |question| question.label.as_str());
            println!("  - {label}: {issue}");
        }
    }

    // Answering can reveal follow-ups, so fill until every visible question has a value.
    loop {
        let pending: Vec<&Question> = session
            .visible_sections(&assessment)
            .into_iter()
            .flat_map(|visible| visible.questions)
            .filter(|question| session.responses().get(question.id.as_str()).is_none())
            .collect();
        if pending.is_empty() {
            break;
        }
        for question in pending {
            session.set_response(question.id.clone(), sample_answer(question, decline));
        }
    }

    println!("\nAnswers");
    for visible in session.visible_sections(&assessment) {
        println!("{}", visible.section.title);
        for question in visible.questions {
            let answer = session
                .responses()
                .get(question.id.as_str())
                .map(describe)
                .unwrap_or_default();
            println!("  - {}: {answer}", question.label);
        }
    }
    let hidden = assessment.questions().count()
        - session
            .visible_sections(&assessment)
            .iter()
            .map(|visible| visible.questions.len())
            .sum::<usize>();
    println!("- {hidden} question(s) hidden by conditionals");

    match session.submit(&service, &assessment, CandidateId(candidate)) {
        Ok(receipt) => println!(
            "\nSubmitted for candidate {candidate} at {}",
            receipt.submitted_at.to_rfc3339()
        ),
        Err(SubmissionError::ValidationFailed(errors)) => {
            println!("\nSubmission rejected:");
            for (question_id, message) in errors.messages() {
                println!("  - {question_id}: {message}");
            }
            return Ok(());
        }
        Err(err) => {
            println!("\nSubmission failed: {err}");
            println!("  {} answer(s) kept for retry", session.responses().len());
            return Ok(());
        }
    }

    match service.response(CandidateId(candidate), JobId(job)) {
        Ok(Some(stored)) => match serde_json::to_string_pretty(&stored) {
            Ok(json) => println!("  Stored response:\n{json}"),
            Err(err) => println!("  Stored response unavailable: {err}"),
        },
        Ok(None) => println!("  Store returned no response"),
        Err(err) => println!("  Store unavailable: {err}"),
    }
    println!("  Responses on record: {}", store.response_count());

    Ok(())
}

fn render_outline(assessment: &Assessment) {
    for section in &assessment.sections {
        println!("{} ({} questions)", section.title, section.questions.len());
        for question in &section.questions {
            let marker = if question.required { "*" } else { " " };
            let gate = question
                .depends_on()
                .and_then(|target| assessment.question(target.as_str()))
                .map(|target| format!(" [shown when \"{}\" matches]", target.label))
                .unwrap_or_default();
            println!(
                "  {marker} {} ({}){gate}",
                question.label,
                question.kind.label()
            );
        }
    }
}

fn sample_answer(question: &Question, decline: bool) -> ResponseValue {
    let options = question.options.as_deref().unwrap_or_default();
    match question.kind {
        QuestionKind::ShortText => {
            let limit = question.max_length.map_or(usize::MAX, |max| max as usize);
            ResponseValue::Text(question.label.chars().take(limit.min(24)).collect())
        }
        QuestionKind::LongText => {
            ResponseValue::Text(format!("Sample answer to \"{}\"", question.label))
        }
        QuestionKind::SingleChoice => {
            let choice = if decline {
                options.last()
            } else {
                options.first()
            };
            choice.cloned().map(ResponseValue::Text).unwrap_or_default()
        }
        QuestionKind::MultiChoice => {
            ResponseValue::Choices(options.iter().take(2).cloned().collect())
        }
        QuestionKind::Numeric => {
            let value = match (question.min, question.max) {
                (Some(min), Some(max)) => ((min + max) / 2.0).round(),
                (Some(min), None) => min,
                (None, Some(max)) => max,
                (None, None) => 1.0,
            };
            ResponseValue::Number(value)
        }
        QuestionKind::FileUpload => ResponseValue::Text("resume.pdf".to_string()),
    }
}

fn describe(value: &ResponseValue) -> String {
    match value {
        ResponseValue::Null => String::new(),
        ResponseValue::Bool(flag) => flag.to_string(),
        ResponseValue::Number(number) => number.to_string(),
        ResponseValue::Text(text) => text.clone(),
        ResponseValue::Choices(choices) => choices.join(", "),
        ResponseValue::Other(raw) => raw.to_string(),
    }
}
