//! Axum route handlers for the interview API.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::interview::lifecycle::{
    self, CompletedInterview, CreateInterviewRequest, InterviewDetail, SubmitAnswerRequest,
};
use crate::models::interview::Answer;
use crate::state::AppState;

/// POST /interviews
pub async fn handle_create_interview(
    State(state): State<AppState>,
    payload: Result<Json<CreateInterviewRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<InterviewDetail>), AppError> {
    let Json(request) = payload?;
    let detail = lifecycle::create_interview(state.store.as_ref(), &state.ai, request).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<InterviewDetail>, AppError> {
    let id = interview_id(id)?;
    let detail = lifecycle::get_interview_detail(state.store.as_ref(), id).await?;
    Ok(Json(detail))
}

/// POST /answers
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    payload: Result<Json<SubmitAnswerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Answer>), AppError> {
    let Json(request) = payload?;
    let answer = lifecycle::submit_answer(state.store.as_ref(), &state.ai, request).await?;
    Ok((StatusCode::CREATED, Json(answer)))
}

/// POST /interviews/:id/complete
pub async fn handle_complete_interview(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<CompletedInterview>, AppError> {
    let id = interview_id(id)?;
    let completed = lifecycle::complete_interview(state.store.as_ref(), &state.ai, id).await?;
    Ok(Json(completed))
}

fn interview_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    match path {
        Ok(Path(id)) if id > 0 => Ok(id),
        Ok(Path(id)) => Err(AppError::Validation(format!("Invalid interview id: {id}"))),
        Err(_) => Err(AppError::Validation("Invalid interview id".to_string())),
    }
}
