//! Interview store — users, interviews, questions and answers held in four
//! identity-keyed collections with per-entity auto-incrementing ids.
//!
//! Handlers receive a store through `AppState` as `Arc<dyn Storage>`; nothing
//! is global, so every test builds its own isolated instance.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::interview::{
    Answer, AnswerFeedback, Interview, InterviewReport, NewAnswer, NewInterview, NewQuestion,
    Question,
};
use crate::models::user::{NewUser, User};

pub mod memory;

pub use memory::MemStorage;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("Question {0} has already been answered")]
    DuplicateAnswer(i64),

    #[error("Username '{0}' is already taken")]
    DuplicateUsername(String),
}

/// The store contract. Lookups and updates of absent ids return `None` rather
/// than an error.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn get_user(&self, id: i64) -> Option<User>;
    async fn get_user_by_username(&self, username: &str) -> Option<User>;

    async fn create_interview(&self, interview: NewInterview) -> Interview;
    async fn get_interview(&self, id: i64) -> Option<Interview>;
    /// Writes the end time and the full report in one step.
    async fn complete_interview(
        &self,
        id: i64,
        report: InterviewReport,
        end_time: DateTime<Utc>,
    ) -> Option<Interview>;

    async fn create_question(&self, question: NewQuestion) -> Question;
    async fn get_question(&self, id: i64) -> Option<Question>;
    /// Questions of an interview, sorted by `order`.
    async fn get_questions_by_interview(&self, interview_id: i64) -> Vec<Question>;

    /// Inserts an answer. Fails if the question already has one; the check and
    /// the insert happen under the same lock.
    async fn create_answer(&self, answer: NewAnswer) -> Result<Answer, StoreError>;
    async fn get_answer(&self, id: i64) -> Option<Answer>;
    async fn get_answer_by_question(&self, question_id: i64) -> Option<Answer>;
    async fn update_answer_feedback(&self, id: i64, feedback: AnswerFeedback) -> Option<Answer>;
    /// All answers for an interview, joined through its questions, in question order.
    async fn get_answers_by_interview(&self, interview_id: i64) -> Vec<Answer>;
}
