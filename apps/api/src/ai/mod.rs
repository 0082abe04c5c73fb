//! Interview AI — question generation, answer scoring and readiness reports.
//!
//! `InterviewAi` is the capability handlers depend on. The concrete backend is
//! chosen once at startup by `select_provider` and always wrapped in
//! `FallbackAi`, which substitutes canned output whenever the backend fails.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::AiProviderConfig;
use crate::llm_client::{Backend, LlmClient, LlmError};
use crate::models::interview::{
    Answer, AnswerFeedback, ExperienceLevel, Interview, InterviewLength, InterviewReport, Question,
    QuestionType,
};

pub mod fallback;
pub mod llm;
pub mod prompts;

pub use fallback::FallbackAi;
pub use llm::LlmInterviewAi;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("No AI provider configured (set ANTHROPIC_API_KEY or OPENAI_API_KEY)")]
    NotConfigured,

    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Provider returned unusable output: {0}")]
    InvalidOutput(String),
}

/// Inputs for question generation, borrowed from a freshly created interview.
#[derive(Debug, Clone)]
pub struct QuestionRequest<'a> {
    pub job_role: &'a str,
    pub experience_level: ExperienceLevel,
    pub target_company: Option<&'a str>,
    pub include_technical: bool,
    pub include_behavioral: bool,
    pub include_company_specific: bool,
    pub length: InterviewLength,
}

impl<'a> From<&'a Interview> for QuestionRequest<'a> {
    fn from(interview: &'a Interview) -> Self {
        Self {
            job_role: &interview.job_role,
            experience_level: interview.experience_level,
            target_company: interview.target_company.as_deref(),
            include_technical: interview.include_technical,
            include_behavioral: interview.include_behavioral,
            include_company_specific: interview.include_company_specific,
            length: interview.interview_length,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ScoreRequest<'a> {
    pub question_text: &'a str,
    pub question_type: QuestionType,
    pub answer_text: &'a str,
    pub job_role: &'a str,
    pub experience_level: ExperienceLevel,
}

#[derive(Debug, Clone)]
pub struct ReportRequest<'a> {
    pub job_role: &'a str,
    pub experience_level: ExperienceLevel,
    pub questions: &'a [Question],
    pub answers: &'a [Answer],
}

#[async_trait]
pub trait InterviewAi: Send + Sync {
    /// Short label for logs ("anthropic", "openai", "unconfigured").
    fn name(&self) -> &'static str;

    async fn generate_questions(
        &self,
        request: &QuestionRequest<'_>,
    ) -> Result<Vec<GeneratedQuestion>, AiError>;

    async fn score_answer(&self, request: &ScoreRequest<'_>) -> Result<AnswerFeedback, AiError>;

    async fn generate_report(
        &self,
        request: &ReportRequest<'_>,
    ) -> Result<InterviewReport, AiError>;
}

/// Used when no credentials are present: every call fails immediately.
pub struct UnconfiguredAi;

#[async_trait]
impl InterviewAi for UnconfiguredAi {
    fn name(&self) -> &'static str {
        "unconfigured"
    }

    async fn generate_questions(
        &self,
        _request: &QuestionRequest<'_>,
    ) -> Result<Vec<GeneratedQuestion>, AiError> {
        Err(AiError::NotConfigured)
    }

    async fn score_answer(&self, _request: &ScoreRequest<'_>) -> Result<AnswerFeedback, AiError> {
        Err(AiError::NotConfigured)
    }

    async fn generate_report(
        &self,
        _request: &ReportRequest<'_>,
    ) -> Result<InterviewReport, AiError> {
        Err(AiError::NotConfigured)
    }
}

/// Builds the backend named by the resolved provider config.
pub fn select_provider(config: &AiProviderConfig) -> Result<Arc<dyn InterviewAi>, LlmError> {
    let provider: Arc<dyn InterviewAi> = match config {
        AiProviderConfig::Anthropic { api_key } => Arc::new(LlmInterviewAi::new(LlmClient::new(
            Backend::Anthropic,
            api_key.clone(),
        )?)),
        AiProviderConfig::OpenAi { api_key } => Arc::new(LlmInterviewAi::new(LlmClient::new(
            Backend::OpenAi,
            api_key.clone(),
        )?)),
        AiProviderConfig::Unconfigured => Arc::new(UnconfiguredAi),
    };
    info!("AI provider selected: {}", provider.name());
    Ok(provider)
}
