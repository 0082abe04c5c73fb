//! Canned output and the `FallbackAi` decorator.
//!
//! The user-visible flow never fails on AI unavailability: any provider error
//! (missing credentials, network, unparseable output) is logged and replaced
//! with fixed data. Callers see which path ran through `AiOutcome`.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::Rng;
use tracing::warn;

use super::{AiError, GeneratedQuestion, InterviewAi, QuestionRequest, ReportRequest, ScoreRequest};
use crate::models::interview::{Answer, AnswerFeedback, InterviewReport, QuestionType};

const FALLBACK_SCORE_MIN: i32 = 70;
const FALLBACK_SCORE_MAX: i32 = 100;
const FALLBACK_CATEGORY_MIN: i32 = 65;
const FALLBACK_CATEGORY_MAX: i32 = 95;

const FALLBACK_CATEGORIES: &[&str] = &[
    "Technical Knowledge",
    "Communication",
    "Problem Solving",
    "Cultural Fit",
];

/// Canned questions, in presentation order. A short interview always gets the first five.
const CANNED_QUESTIONS: &[(QuestionType, &str)] = &[
    (
        QuestionType::Behavioral,
        "Tell me about yourself and your experience in this field.",
    ),
    (
        QuestionType::Technical,
        "Describe a challenging technical problem you solved recently. What was your approach?",
    ),
    (
        QuestionType::Behavioral,
        "Tell me about a time you disagreed with a teammate. How did you resolve it?",
    ),
    (
        QuestionType::Technical,
        "How do you make sure the code you ship is reliable and maintainable?",
    ),
    (
        QuestionType::Behavioral,
        "Where do you see yourself in five years?",
    ),
    (
        QuestionType::Technical,
        "Walk me through how you would debug a production issue you cannot reproduce locally.",
    ),
    (
        QuestionType::Behavioral,
        "Describe a project that failed or went off track. What did you learn?",
    ),
    (
        QuestionType::Technical,
        "How do you decide between building something yourself and using an existing library?",
    ),
    (
        QuestionType::Behavioral,
        "Tell me about a time you had to learn a new skill quickly.",
    ),
    (
        QuestionType::Technical,
        "Explain a system you designed end to end and the trade-offs you made.",
    ),
    (
        QuestionType::Behavioral,
        "How do you prioritize when several urgent tasks land at once?",
    ),
    (
        QuestionType::Technical,
        "How would you improve the performance of a slow page or endpoint?",
    ),
    (
        QuestionType::Behavioral,
        "Describe feedback you received that changed how you work.",
    ),
    (
        QuestionType::Technical,
        "What testing strategy would you put in place for a new service?",
    ),
    (
        QuestionType::Behavioral,
        "Why are you interested in this role?",
    ),
];

/// Result of a decorated AI call: either the provider's value or a canned substitute.
#[derive(Debug, Clone, PartialEq)]
pub enum AiOutcome<T> {
    Provider(T),
    Fallback { value: T, reason: String },
}

impl<T> AiOutcome<T> {
    pub fn is_fallback(&self) -> bool {
        self.fallback_reason().is_some()
    }

    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            AiOutcome::Provider(_) => None,
            AiOutcome::Fallback { reason, .. } => Some(reason.as_str()),
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            AiOutcome::Provider(value) | AiOutcome::Fallback { value, .. } => value,
        }
    }
}

/// Wraps any `InterviewAi` and masks its failures with canned data.
#[derive(Clone)]
pub struct FallbackAi {
    inner: Arc<dyn InterviewAi>,
}

impl FallbackAi {
    pub fn new(inner: Arc<dyn InterviewAi>) -> Self {
        Self { inner }
    }

    pub fn provider_name(&self) -> &'static str {
        self.inner.name()
    }

    pub async fn generate_questions(
        &self,
        request: &QuestionRequest<'_>,
    ) -> AiOutcome<Vec<GeneratedQuestion>> {
        let result = self.inner.generate_questions(request).await;
        self.settle("generate_questions", result, || {
            canned_questions(request.length.question_count())
        })
    }

    pub async fn score_answer(&self, request: &ScoreRequest<'_>) -> AiOutcome<AnswerFeedback> {
        let result = self.inner.score_answer(request).await;
        self.settle("score_answer", result, canned_feedback)
    }

    pub async fn generate_report(&self, request: &ReportRequest<'_>) -> AiOutcome<InterviewReport> {
        let result = self.inner.generate_report(request).await;
        self.settle("generate_report", result, || canned_report(request.answers))
    }

    fn settle<T>(
        &self,
        operation: &str,
        result: Result<T, AiError>,
        fallback: impl FnOnce() -> T,
    ) -> AiOutcome<T> {
        match result {
            Ok(value) => AiOutcome::Provider(value),
            Err(e) => {
                warn!(
                    "{operation} via {} failed, using fallback: {e}",
                    self.inner.name()
                );
                AiOutcome::Fallback {
                    value: fallback(),
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// The first `count` canned questions. Never more than the pool holds.
pub fn canned_questions(count: usize) -> Vec<GeneratedQuestion> {
    CANNED_QUESTIONS
        .iter()
        .take(count)
        .map(|(question_type, text)| GeneratedQuestion {
            question_type: *question_type,
            text: text.to_string(),
        })
        .collect()
}

pub fn canned_feedback() -> AnswerFeedback {
    let score = rand::thread_rng().gen_range(FALLBACK_SCORE_MIN..=FALLBACK_SCORE_MAX);
    AnswerFeedback {
        score,
        feedback: "Good answer. You covered the key points; adding a concrete example \
            with measurable results would make it stronger."
            .to_string(),
        strengths: vec![
            "Clear communication".to_string(),
            "Relevant experience".to_string(),
        ],
        weaknesses: vec!["Could include more specific examples".to_string()],
    }
}

/// Readiness is the rounded mean of the scored answers, or 0 when none were scored.
pub fn canned_report(answers: &[Answer]) -> InterviewReport {
    let mut rng = rand::thread_rng();
    let category_scores: BTreeMap<String, i32> = FALLBACK_CATEGORIES
        .iter()
        .map(|category| {
            (
                category.to_string(),
                rng.gen_range(FALLBACK_CATEGORY_MIN..=FALLBACK_CATEGORY_MAX),
            )
        })
        .collect();

    InterviewReport {
        readiness_score: mean_score(answers),
        strengths: vec![
            "Strong communication skills".to_string(),
            "Good technical foundation".to_string(),
            "Structured problem solving".to_string(),
        ],
        weaknesses: vec![
            "Answers could use more concrete examples".to_string(),
            "Some responses lacked depth on trade-offs".to_string(),
        ],
        category_scores,
        recommendations: vec![
            "Practice the STAR method for behavioral questions".to_string(),
            "Review core concepts for the role before the interview".to_string(),
            "Prepare two or three stories with measurable outcomes".to_string(),
        ],
    }
}

fn mean_score(answers: &[Answer]) -> i32 {
    let scores: Vec<i32> = answers.iter().filter_map(|a| a.score).collect();
    if scores.is_empty() {
        return 0;
    }
    let total: i64 = scores.iter().map(|s| i64::from(*s)).sum();
    (total as f64 / scores.len() as f64).round() as i32
}
