use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExperienceLevel {
    Junior,
    MidLevel,
    Senior,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Junior => "junior",
            ExperienceLevel::MidLevel => "mid-level",
            ExperienceLevel::Senior => "senior",
        }
    }
}

/// Length category of an interview. Maps to a fixed question count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewLength {
    Short,
    Medium,
    Long,
}

impl InterviewLength {
    pub fn question_count(&self) -> usize {
        match self {
            InterviewLength::Short => 5,
            InterviewLength::Medium => 10,
            InterviewLength::Long => 15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    Technical,
    Behavioral,
    CompanySpecific,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Technical => "technical",
            QuestionType::Behavioral => "behavioral",
            QuestionType::CompanySpecific => "company-specific",
        }
    }
}

/// Final readiness report. Attached to an interview in a single write on completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewReport {
    pub readiness_score: i32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub category_scores: BTreeMap<String, i32>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: i64,
    pub job_role: String,
    pub experience_level: ExperienceLevel,
    pub target_company: Option<String>,
    pub include_technical: bool,
    pub include_behavioral: bool,
    pub include_company_specific: bool,
    pub interview_length: InterviewLength,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub readiness_score: Option<i32>,
    pub strengths: Option<Vec<String>>,
    pub weaknesses: Option<Vec<String>>,
    pub category_scores: Option<BTreeMap<String, i32>>,
    pub recommendations: Option<Vec<String>>,
}

impl Interview {
    pub fn is_completed(&self) -> bool {
        self.end_time.is_some()
    }

    /// Sets the end time and every report field together.
    pub fn attach_report(&mut self, report: InterviewReport, end_time: DateTime<Utc>) {
        self.end_time = Some(end_time);
        self.readiness_score = Some(report.readiness_score);
        self.strengths = Some(report.strengths);
        self.weaknesses = Some(report.weaknesses);
        self.category_scores = Some(report.category_scores);
        self.recommendations = Some(report.recommendations);
    }
}

/// Setup values for a new interview. `start_time` is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewInterview {
    pub job_role: String,
    pub experience_level: ExperienceLevel,
    pub target_company: Option<String>,
    pub include_technical: bool,
    pub include_behavioral: bool,
    pub include_company_specific: bool,
    pub interview_length: InterviewLength,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub interview_id: i64,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub text: String,
    /// Zero-based position within the interview.
    pub order: usize,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub interview_id: i64,
    pub question_type: QuestionType,
    pub text: String,
    pub order: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: i64,
    pub question_id: i64,
    pub answer_text: String,
    pub feedback: Option<String>,
    pub score: Option<i32>,
    pub strengths: Option<Vec<String>>,
    pub weaknesses: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct NewAnswer {
    pub question_id: i64,
    pub answer_text: String,
}

/// AI-derived feedback attached to an answer after scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFeedback {
    pub score: i32,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}
