//! Interview lifecycle operations. Each runs its store reads/writes and at most
//! one AI call sequentially; axum handlers are thin wrappers over these.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ai::{FallbackAi, QuestionRequest, ReportRequest, ScoreRequest};
use crate::errors::AppError;
use crate::models::interview::{
    Answer, ExperienceLevel, Interview, InterviewLength, NewAnswer, NewInterview, NewQuestion,
    Question,
};
use crate::storage::Storage;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInterviewRequest {
    pub job_role: String,
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub target_company: Option<String>,
    #[serde(default = "default_true")]
    pub include_technical: bool,
    #[serde(default = "default_true")]
    pub include_behavioral: bool,
    #[serde(default)]
    pub include_company_specific: bool,
    pub interview_length: InterviewLength,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    pub interview_id: i64,
    pub question_id: i64,
    pub answer_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewDetail {
    pub interview: Interview,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedInterview {
    pub interview: Interview,
    pub questions: Vec<Question>,
    pub answers: Vec<Answer>,
}

// ────────────────────────────────────────────────────────────────────────────
// Operations
// ────────────────────────────────────────────────────────────────────────────

/// Creates the interview, asks the AI for questions and stores them in order.
pub async fn create_interview(
    store: &dyn Storage,
    ai: &FallbackAi,
    request: CreateInterviewRequest,
) -> Result<InterviewDetail, AppError> {
    let job_role = request.job_role.trim();
    if job_role.is_empty() {
        return Err(AppError::Validation("jobRole is required".to_string()));
    }
    let target_company = request
        .target_company
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    let interview = store
        .create_interview(NewInterview {
            job_role: job_role.to_string(),
            experience_level: request.experience_level,
            target_company,
            include_technical: request.include_technical,
            include_behavioral: request.include_behavioral,
            include_company_specific: request.include_company_specific,
            interview_length: request.interview_length,
        })
        .await;

    let outcome = ai
        .generate_questions(&QuestionRequest::from(&interview))
        .await;
    let from_fallback = outcome.is_fallback();

    let mut questions = Vec::new();
    for (order, generated) in outcome.into_inner().into_iter().enumerate() {
        let question = store
            .create_question(NewQuestion {
                interview_id: interview.id,
                question_type: generated.question_type,
                text: generated.text,
                order,
            })
            .await;
        questions.push(question);
    }

    info!(
        "Created interview {} with {} questions (fallback={})",
        interview.id,
        questions.len(),
        from_fallback
    );

    Ok(InterviewDetail {
        interview,
        questions,
    })
}

pub async fn get_interview_detail(
    store: &dyn Storage,
    interview_id: i64,
) -> Result<InterviewDetail, AppError> {
    let interview = find_interview(store, interview_id).await?;
    let questions = store.get_questions_by_interview(interview_id).await;
    Ok(InterviewDetail {
        interview,
        questions,
    })
}

/// Stores an answer and attaches AI feedback to it.
pub async fn submit_answer(
    store: &dyn Storage,
    ai: &FallbackAi,
    request: SubmitAnswerRequest,
) -> Result<Answer, AppError> {
    if request.interview_id <= 0 || request.question_id <= 0 {
        return Err(AppError::Validation(
            "interviewId and questionId must be positive".to_string(),
        ));
    }
    let answer_text = request.answer_text.trim();
    if answer_text.is_empty() {
        return Err(AppError::Validation("answerText is required".to_string()));
    }

    let interview = find_interview(store, request.interview_id).await?;
    let question = store
        .get_question(request.question_id)
        .await
        .filter(|q| q.interview_id == interview.id)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Question {} not found in interview {}",
                request.question_id, interview.id
            ))
        })?;

    if store.get_answer_by_question(question.id).await.is_some() {
        return Err(AppError::Validation(format!(
            "Question {} has already been answered",
            question.id
        )));
    }

    // The store re-checks uniqueness atomically; a concurrent duplicate loses here.
    let answer = store
        .create_answer(NewAnswer {
            question_id: question.id,
            answer_text: answer_text.to_string(),
        })
        .await?;

    let outcome = ai
        .score_answer(&ScoreRequest {
            question_text: &question.text,
            question_type: question.question_type,
            answer_text: &answer.answer_text,
            job_role: &interview.job_role,
            experience_level: interview.experience_level,
        })
        .await;
    let from_fallback = outcome.is_fallback();

    let scored = store
        .update_answer_feedback(answer.id, outcome.into_inner())
        .await
        .ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("Answer {} vanished before scoring", answer.id))
        })?;

    info!(
        "Scored answer {} for question {}: {:?} (fallback={})",
        scored.id, question.id, scored.score, from_fallback
    );

    Ok(scored)
}

/// Generates the readiness report and closes the interview.
/// Completing again regenerates and overwrites the report.
pub async fn complete_interview(
    store: &dyn Storage,
    ai: &FallbackAi,
    interview_id: i64,
) -> Result<CompletedInterview, AppError> {
    let interview = find_interview(store, interview_id).await?;
    if interview.is_completed() {
        info!("Interview {interview_id} already completed, regenerating report");
    }
    let questions = store.get_questions_by_interview(interview_id).await;
    if questions.is_empty() {
        return Err(AppError::Validation(format!(
            "Interview {interview_id} has no questions"
        )));
    }
    let answers = store.get_answers_by_interview(interview_id).await;

    let outcome = ai
        .generate_report(&ReportRequest {
            job_role: &interview.job_role,
            experience_level: interview.experience_level,
            questions: &questions,
            answers: &answers,
        })
        .await;
    let from_fallback = outcome.is_fallback();

    let interview = store
        .complete_interview(interview_id, outcome.into_inner(), Utc::now())
        .await
        .ok_or_else(|| AppError::NotFound(format!("Interview {interview_id} not found")))?;

    info!(
        "Completed interview {} with {}/{} answers, readiness {:?} (fallback={})",
        interview.id,
        answers.len(),
        questions.len(),
        interview.readiness_score,
        from_fallback
    );

    Ok(CompletedInterview {
        interview,
        questions,
        answers,
    })
}

async fn find_interview(store: &dyn Storage, interview_id: i64) -> Result<Interview, AppError> {
    store
        .get_interview(interview_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Interview {interview_id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::ai::{AiError, GeneratedQuestion, InterviewAi, UnconfiguredAi};
    use crate::models::interview::{AnswerFeedback, InterviewReport, QuestionType};
    use crate::storage::MemStorage;

    /// Provider that always succeeds with fixed values.
    struct ScriptedAi;

    #[async_trait]
    impl InterviewAi for ScriptedAi {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn generate_questions(
            &self,
            request: &QuestionRequest<'_>,
        ) -> Result<Vec<GeneratedQuestion>, AiError> {
            Ok((0..request.length.question_count())
                .map(|i| GeneratedQuestion {
                    question_type: QuestionType::CompanySpecific,
                    text: format!("Why {}? ({i})", request.target_company.unwrap_or("us")),
                })
                .collect())
        }

        async fn score_answer(
            &self,
            _request: &ScoreRequest<'_>,
        ) -> Result<AnswerFeedback, AiError> {
            Ok(AnswerFeedback {
                score: 42,
                feedback: "Needs depth".to_string(),
                strengths: vec![],
                weaknesses: vec!["Vague".to_string()],
            })
        }

        async fn generate_report(
            &self,
            request: &ReportRequest<'_>,
        ) -> Result<InterviewReport, AiError> {
            Ok(InterviewReport {
                readiness_score: request.answers.len() as i32,
                strengths: vec!["Honest".to_string()],
                weaknesses: vec![],
                category_scores: BTreeMap::from([("Communication".to_string(), 50)]),
                recommendations: vec!["Prepare examples".to_string()],
            })
        }
    }

    fn fallback_ai() -> FallbackAi {
        FallbackAi::new(Arc::new(UnconfiguredAi))
    }

    fn setup(length: InterviewLength) -> CreateInterviewRequest {
        CreateInterviewRequest {
            job_role: "Software Engineer".to_string(),
            experience_level: ExperienceLevel::MidLevel,
            target_company: None,
            include_technical: true,
            include_behavioral: true,
            include_company_specific: false,
            interview_length: length,
        }
    }

    fn answer_for(interview_id: i64, question_id: i64, text: &str) -> SubmitAnswerRequest {
        SubmitAnswerRequest {
            interview_id,
            question_id,
            answer_text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_fallback_question_counts_follow_length() {
        let store = MemStorage::new();
        let ai = fallback_ai();
        for (length, expected) in [
            (InterviewLength::Short, 5),
            (InterviewLength::Medium, 10),
            (InterviewLength::Long, 15),
        ] {
            let detail = create_interview(&store, &ai, setup(length)).await.unwrap();
            assert_eq!(detail.questions.len(), expected);
            let orders: Vec<usize> = detail.questions.iter().map(|q| q.order).collect();
            assert_eq!(orders, (0..expected).collect::<Vec<_>>());
        }
    }

    #[tokio::test]
    async fn test_blank_job_role_is_rejected_before_any_write() {
        let store = MemStorage::new();
        let mut request = setup(InterviewLength::Short);
        request.job_role = "   ".to_string();

        let err = create_interview(&store, &fallback_ai(), request)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.get_interview(1).await.is_none());
    }

    #[tokio::test]
    async fn test_provider_questions_are_stored_in_order() {
        let store = MemStorage::new();
        let ai = FallbackAi::new(Arc::new(ScriptedAi));
        let mut request = setup(InterviewLength::Short);
        request.target_company = Some(" Initech ".to_string());

        let detail = create_interview(&store, &ai, request).await.unwrap();

        assert_eq!(detail.interview.target_company.as_deref(), Some("Initech"));
        assert_eq!(detail.questions[3].text, "Why Initech? (3)");
        assert_eq!(detail, get_interview_detail(&store, detail.interview.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_unknown_interview_is_not_found() {
        let store = MemStorage::new();
        let err = get_interview_detail(&store, 7).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_submit_answer_attaches_feedback() {
        let store = MemStorage::new();
        let ai = FallbackAi::new(Arc::new(ScriptedAi));
        let detail = create_interview(&store, &ai, setup(InterviewLength::Short))
            .await
            .unwrap();
        let question = &detail.questions[0];

        let answer = submit_answer(
            &store,
            &ai,
            answer_for(detail.interview.id, question.id, "  Because of the mission.  "),
        )
        .await
        .unwrap();

        assert_eq!(answer.answer_text, "Because of the mission.");
        assert_eq!(answer.score, Some(42));
        assert_eq!(answer.weaknesses, Some(vec!["Vague".to_string()]));
    }

    #[tokio::test]
    async fn test_second_answer_is_rejected_and_first_kept() {
        let store = MemStorage::new();
        let ai = fallback_ai();
        let detail = create_interview(&store, &ai, setup(InterviewLength::Short))
            .await
            .unwrap();
        let interview_id = detail.interview.id;
        let question_id = detail.questions[0].id;

        let first = submit_answer(&store, &ai, answer_for(interview_id, question_id, "first"))
            .await
            .unwrap();
        let err = submit_answer(&store, &ai, answer_for(interview_id, question_id, "second"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.get_answer_by_question(question_id).await, Some(first));
    }

    #[tokio::test]
    async fn test_answer_for_question_of_other_interview_is_not_found() {
        let store = MemStorage::new();
        let ai = fallback_ai();
        let first = create_interview(&store, &ai, setup(InterviewLength::Short))
            .await
            .unwrap();
        let second = create_interview(&store, &ai, setup(InterviewLength::Short))
            .await
            .unwrap();

        let err = submit_answer(
            &store,
            &ai,
            answer_for(second.interview.id, first.questions[0].id, "wrong interview"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(store
            .get_answer_by_question(first.questions[0].id)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_blank_answer_text_is_rejected() {
        let store = MemStorage::new();
        let ai = fallback_ai();
        let detail = create_interview(&store, &ai, setup(InterviewLength::Short))
            .await
            .unwrap();

        let err = submit_answer(
            &store,
            &ai,
            answer_for(detail.interview.id, detail.questions[0].id, "\n"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_complete_without_questions_is_rejected_and_untouched() {
        let store = MemStorage::new();
        let interview = store
            .create_interview(NewInterview {
                job_role: "Designer".to_string(),
                experience_level: ExperienceLevel::Junior,
                target_company: None,
                include_technical: false,
                include_behavioral: true,
                include_company_specific: false,
                interview_length: InterviewLength::Short,
            })
            .await;

        let err = complete_interview(&store, &fallback_ai(), interview.id)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.get_interview(interview.id).await, Some(interview));
    }

    #[tokio::test]
    async fn test_full_fallback_session_readiness_is_mean_of_scores() {
        let store = MemStorage::new();
        let ai = fallback_ai();
        let detail = create_interview(&store, &ai, setup(InterviewLength::Short))
            .await
            .unwrap();
        assert_eq!(detail.questions.len(), 5);

        let mut scores = Vec::new();
        for question in &detail.questions {
            let answer = submit_answer(
                &store,
                &ai,
                answer_for(detail.interview.id, question.id, "A thoughtful answer"),
            )
            .await
            .unwrap();
            let score = answer.score.unwrap();
            assert!((70..=100).contains(&score));
            scores.push(score);
        }

        let completed = complete_interview(&store, &ai, detail.interview.id)
            .await
            .unwrap();
        let mean = (scores.iter().sum::<i32>() as f64 / scores.len() as f64).round() as i32;

        assert_eq!(completed.answers.len(), 5);
        assert_eq!(completed.interview.readiness_score, Some(mean));
        assert!(completed.interview.end_time.is_some());
        assert!(completed.interview.strengths.is_some());
        assert!(completed.interview.category_scores.is_some());
        assert!(completed.interview.recommendations.is_some());
    }

    #[tokio::test]
    async fn test_completing_twice_overwrites_report() {
        let store = MemStorage::new();
        let ai = FallbackAi::new(Arc::new(ScriptedAi));
        let detail = create_interview(&store, &ai, setup(InterviewLength::Short))
            .await
            .unwrap();

        let first = complete_interview(&store, &ai, detail.interview.id)
            .await
            .unwrap();
        assert_eq!(first.interview.readiness_score, Some(0));

        submit_answer(
            &store,
            &ai,
            answer_for(detail.interview.id, detail.questions[0].id, "late answer"),
        )
        .await
        .unwrap();
        let second = complete_interview(&store, &ai, detail.interview.id)
            .await
            .unwrap();
        assert_eq!(second.interview.readiness_score, Some(1));
    }
}
