use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::user::{NewUser, User};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// POST /users
///
/// Registers a user. The password is stored as given and never echoed back.
pub async fn handle_register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let Json(request) = payload?;
    let username = request.username.trim();
    if username.is_empty() || request.password.is_empty() {
        return Err(AppError::Validation(
            "username and password are required".to_string(),
        ));
    }

    let user = state
        .store
        .create_user(NewUser {
            username: username.to_string(),
            password: request.password,
        })
        .await?;

    tracing::info!("Registered user {} ({})", user.id, user.username);
    Ok((StatusCode::CREATED, Json(user)))
}
