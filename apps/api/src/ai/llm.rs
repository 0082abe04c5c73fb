use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use super::prompts::{
    fill_template, INTERVIEWER_SYSTEM, QUESTIONS_PROMPT_TEMPLATE, REPORT_PROMPT_TEMPLATE,
    SCORE_PROMPT_TEMPLATE,
};
use super::{AiError, GeneratedQuestion, InterviewAi, QuestionRequest, ReportRequest, ScoreRequest};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{Backend, LlmClient};
use crate::models::interview::{AnswerFeedback, InterviewReport};

/// `InterviewAi` over a single upstream LLM. One call per operation.
pub struct LlmInterviewAi {
    llm: LlmClient,
    system: String,
}

impl LlmInterviewAi {
    pub fn new(llm: LlmClient) -> Self {
        info!("LLM client initialized (model: {})", llm.backend().model());
        Self {
            llm,
            system: format!("{INTERVIEWER_SYSTEM} {JSON_ONLY_SYSTEM}"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QuestionsReply {
    questions: Vec<GeneratedQuestion>,
}

// Models occasionally answer with fractional scores, so they are read as f64.
#[derive(Debug, Deserialize)]
struct EvaluationReply {
    score: f64,
    feedback: String,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    weaknesses: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportReply {
    readiness_score: f64,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    weaknesses: Vec<String>,
    #[serde(default)]
    category_scores: BTreeMap<String, f64>,
    #[serde(default)]
    recommendations: Vec<String>,
}

#[async_trait]
impl InterviewAi for LlmInterviewAi {
    fn name(&self) -> &'static str {
        match self.llm.backend() {
            Backend::Anthropic => "anthropic",
            Backend::OpenAi => "openai",
        }
    }

    async fn generate_questions(
        &self,
        request: &QuestionRequest<'_>,
    ) -> Result<Vec<GeneratedQuestion>, AiError> {
        let prompt = build_questions_prompt(request);
        let reply: QuestionsReply = self.llm.call_json(&prompt, &self.system).await?;

        let mut questions: Vec<GeneratedQuestion> = reply
            .questions
            .into_iter()
            .filter(|q| !q.text.trim().is_empty())
            .collect();
        if questions.is_empty() {
            return Err(AiError::InvalidOutput("question list was empty".to_string()));
        }
        questions.truncate(request.length.question_count());
        Ok(questions)
    }

    async fn score_answer(&self, request: &ScoreRequest<'_>) -> Result<AnswerFeedback, AiError> {
        let prompt = build_score_prompt(request);
        let reply: EvaluationReply = self.llm.call_json(&prompt, &self.system).await?;
        Ok(AnswerFeedback {
            score: reply.score.round() as i32,
            feedback: reply.feedback,
            strengths: reply.strengths,
            weaknesses: reply.weaknesses,
        })
    }

    async fn generate_report(
        &self,
        request: &ReportRequest<'_>,
    ) -> Result<InterviewReport, AiError> {
        let prompt = build_report_prompt(request)?;
        let reply: ReportReply = self.llm.call_json(&prompt, &self.system).await?;
        Ok(InterviewReport {
            readiness_score: reply.readiness_score.round() as i32,
            strengths: reply.strengths,
            weaknesses: reply.weaknesses,
            category_scores: reply
                .category_scores
                .into_iter()
                .map(|(category, score)| (category, score.round() as i32))
                .collect(),
            recommendations: reply.recommendations,
        })
    }
}

fn build_questions_prompt(request: &QuestionRequest<'_>) -> String {
    let mut categories = Vec::new();
    if request.include_technical {
        categories.push("technical");
    }
    if request.include_behavioral {
        categories.push("behavioral");
    }
    if request.include_company_specific {
        categories.push("company-specific");
    }
    if categories.is_empty() {
        categories.extend(["technical", "behavioral"]);
    }

    let company_line = match request.target_company {
        Some(company) if !company.trim().is_empty() => {
            format!("The candidate is interviewing at {company}.")
        }
        _ => String::new(),
    };

    let count = request.length.question_count().to_string();
    let categories = categories.join(", ");
    fill_template(
        QUESTIONS_PROMPT_TEMPLATE,
        &[
            ("count", count.as_str()),
            ("job_role", request.job_role),
            ("experience_level", request.experience_level.as_str()),
            ("company_line", company_line.as_str()),
            ("categories", categories.as_str()),
        ],
    )
}

fn build_score_prompt(request: &ScoreRequest<'_>) -> String {
    fill_template(
        SCORE_PROMPT_TEMPLATE,
        &[
            ("job_role", request.job_role),
            ("experience_level", request.experience_level.as_str()),
            ("question_type", request.question_type.as_str()),
            ("question", request.question_text),
            ("answer", request.answer_text),
        ],
    )
}

fn build_report_prompt(request: &ReportRequest<'_>) -> Result<String, AiError> {
    let transcript = build_transcript(request)?;
    Ok(fill_template(
        REPORT_PROMPT_TEMPLATE,
        &[
            ("job_role", request.job_role),
            ("experience_level", request.experience_level.as_str()),
            ("transcript", transcript.as_str()),
        ],
    ))
}

/// Pairs each question with its answer (if any) for the report prompt.
fn build_transcript(request: &ReportRequest<'_>) -> Result<String, AiError> {
    let entries: Vec<serde_json::Value> = request
        .questions
        .iter()
        .map(|q| {
            let answer = request.answers.iter().find(|a| a.question_id == q.id);
            serde_json::json!({
                "type": q.question_type,
                "question": q.text,
                "answer": answer.map(|a| a.answer_text.as_str()),
                "score": answer.and_then(|a| a.score),
                "feedback": answer.and_then(|a| a.feedback.as_deref()),
            })
        })
        .collect();

    serde_json::to_string_pretty(&entries)
        .map_err(|e| AiError::InvalidOutput(format!("failed to serialize transcript: {e}")))
}
