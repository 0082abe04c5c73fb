use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{Storage, StoreError};
use crate::models::interview::{
    Answer, AnswerFeedback, Interview, InterviewReport, NewAnswer, NewInterview, NewQuestion,
    Question,
};
use crate::models::user::{NewUser, User};

/// Process-lifetime store. Nothing survives a restart.
#[derive(Default)]
pub struct MemStorage {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    interviews: BTreeMap<i64, Interview>,
    questions: BTreeMap<i64, Question>,
    answers: BTreeMap<i64, Answer>,
    next_user_id: i64,
    next_interview_id: i64,
    next_question_id: i64,
    next_answer_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.inner.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::DuplicateUsername(user.username));
        }
        let id = next_id(&mut tables.next_user_id);
        let user = User {
            id,
            username: user.username,
            password: user.password,
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> Option<User> {
        self.inner.read().await.users.get(&id).cloned()
    }

    async fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.inner
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    async fn create_interview(&self, interview: NewInterview) -> Interview {
        let mut tables = self.inner.write().await;
        let id = next_id(&mut tables.next_interview_id);
        let interview = Interview {
            id,
            job_role: interview.job_role,
            experience_level: interview.experience_level,
            target_company: interview.target_company,
            include_technical: interview.include_technical,
            include_behavioral: interview.include_behavioral,
            include_company_specific: interview.include_company_specific,
            interview_length: interview.interview_length,
            start_time: Utc::now(),
            end_time: None,
            readiness_score: None,
            strengths: None,
            weaknesses: None,
            category_scores: None,
            recommendations: None,
        };
        tables.interviews.insert(id, interview.clone());
        interview
    }

    async fn get_interview(&self, id: i64) -> Option<Interview> {
        self.inner.read().await.interviews.get(&id).cloned()
    }

    async fn complete_interview(
        &self,
        id: i64,
        report: InterviewReport,
        end_time: DateTime<Utc>,
    ) -> Option<Interview> {
        let mut tables = self.inner.write().await;
        let interview = tables.interviews.get_mut(&id)?;
        interview.attach_report(report, end_time);
        Some(interview.clone())
    }

    async fn create_question(&self, question: NewQuestion) -> Question {
        let mut tables = self.inner.write().await;
        let id = next_id(&mut tables.next_question_id);
        let question = Question {
            id,
            interview_id: question.interview_id,
            question_type: question.question_type,
            text: question.text,
            order: question.order,
        };
        tables.questions.insert(id, question.clone());
        question
    }

    async fn get_question(&self, id: i64) -> Option<Question> {
        self.inner.read().await.questions.get(&id).cloned()
    }

    async fn get_questions_by_interview(&self, interview_id: i64) -> Vec<Question> {
        let tables = self.inner.read().await;
        let mut questions: Vec<Question> = tables
            .questions
            .values()
            .filter(|q| q.interview_id == interview_id)
            .cloned()
            .collect();
        questions.sort_by_key(|q| q.order);
        questions
    }

    async fn create_answer(&self, answer: NewAnswer) -> Result<Answer, StoreError> {
        let mut tables = self.inner.write().await;
        if tables
            .answers
            .values()
            .any(|a| a.question_id == answer.question_id)
        {
            return Err(StoreError::DuplicateAnswer(answer.question_id));
        }
        let id = next_id(&mut tables.next_answer_id);
        let answer = Answer {
            id,
            question_id: answer.question_id,
            answer_text: answer.answer_text,
            feedback: None,
            score: None,
            strengths: None,
            weaknesses: None,
        };
        tables.answers.insert(id, answer.clone());
        Ok(answer)
    }

    async fn get_answer(&self, id: i64) -> Option<Answer> {
        self.inner.read().await.answers.get(&id).cloned()
    }

    async fn get_answer_by_question(&self, question_id: i64) -> Option<Answer> {
        self.inner
            .read()
            .await
            .answers
            .values()
            .find(|a| a.question_id == question_id)
            .cloned()
    }

    async fn update_answer_feedback(&self, id: i64, feedback: AnswerFeedback) -> Option<Answer> {
        let mut tables = self.inner.write().await;
        let answer = tables.answers.get_mut(&id)?;
        answer.feedback = Some(feedback.feedback);
        answer.score = Some(feedback.score);
        answer.strengths = Some(feedback.strengths);
        answer.weaknesses = Some(feedback.weaknesses);
        Some(answer.clone())
    }

    async fn get_answers_by_interview(&self, interview_id: i64) -> Vec<Answer> {
        let tables = self.inner.read().await;
        let mut questions: Vec<&Question> = tables
            .questions
            .values()
            .filter(|q| q.interview_id == interview_id)
            .collect();
        questions.sort_by_key(|q| q.order);

        questions
            .into_iter()
            .filter_map(|q| tables.answers.values().find(|a| a.question_id == q.id))
            .cloned()
            .collect()
    }
}
