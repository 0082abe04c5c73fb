pub mod health;
pub mod users;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/users", post(users::handle_register))
        // Interview lifecycle
        .route("/interviews", post(handlers::handle_create_interview))
        .route("/interviews/:id", get(handlers::handle_get_interview))
        .route(
            "/interviews/:id/complete",
            post(handlers::handle_complete_interview),
        )
        .route("/answers", post(handlers::handle_submit_answer))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::ai::{FallbackAi, UnconfiguredAi};
    use crate::models::interview::{ExperienceLevel, InterviewLength, NewInterview};
    use crate::storage::{MemStorage, Storage};

    fn test_state() -> (AppState, Arc<MemStorage>) {
        let store = Arc::new(MemStorage::new());
        let state = AppState::new(store.clone(), FallbackAi::new(Arc::new(UnconfiguredAi)));
        (state, store)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn setup_body(length: &str) -> Value {
        json!({
            "jobRole": "Software Engineer",
            "experienceLevel": "mid-level",
            "interviewLength": length,
            "includeTechnical": true,
            "includeBehavioral": true
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _) = test_state();
        let app = build_router(state);
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let (state, _) = test_state();
        let app = build_router(state);

        let body = Some(setup_body("medium"));
        let (status, created) = send(&app, Method::POST, "/interviews", body).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["questions"].as_array().unwrap().len(), 10);
        assert_eq!(created["interview"]["includeCompanySpecific"], false);
        assert!(created["interview"]["endTime"].is_null());

        let id = created["interview"]["id"].as_i64().unwrap();
        let (status, fetched) = send(&app, Method::GET, &format!("/interviews/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_enum_values() {
        let (state, _) = test_state();
        let app = build_router(state);

        let mut body = setup_body("short");
        body["experienceLevel"] = json!("principal");
        let (status, error) = send(&app, Method::POST, "/interviews", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"]["code"], "VALIDATION_ERROR");

        let (status, _) = send(&app, Method::POST, "/interviews", Some(setup_body("epic"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_requires_job_role() {
        let (state, _) = test_state();
        let app = build_router(state);

        let mut body = setup_body("short");
        body.as_object_mut().unwrap().remove("jobRole");
        let (status, _) = send(&app, Method::POST, "/interviews", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_invalid_and_missing_ids() {
        let (state, _) = test_state();
        let app = build_router(state);

        let (status, _) = send(&app, Method::GET, "/interviews/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, error) = send(&app, Method::GET, "/interviews/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_answer_flow_and_duplicate_rejection() {
        let (state, store) = test_state();
        let app = build_router(state);

        let (_, created) = send(&app, Method::POST, "/interviews", Some(setup_body("short"))).await;
        let interview_id = created["interview"]["id"].as_i64().unwrap();
        let question_id = created["questions"][0]["id"].as_i64().unwrap();

        let answer = json!({
            "interviewId": interview_id,
            "questionId": question_id,
            "answerText": "I focus on clear ownership and small PRs."
        });
        let (status, first) = send(&app, Method::POST, "/answers", Some(answer.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(first["questionId"], question_id);
        let score = first["score"].as_i64().unwrap();
        assert!((70..=100).contains(&score));
        assert!(first["feedback"].is_string());

        let mut again = answer;
        again["answerText"] = json!("A different answer");
        let (status, _) = send(&app, Method::POST, "/answers", Some(again)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let stored = store.get_answer_by_question(question_id).await.unwrap();
        assert_eq!(stored.answer_text, "I focus on clear ownership and small PRs.");
    }

    #[tokio::test]
    async fn test_answer_to_unknown_question_is_not_found() {
        let (state, _) = test_state();
        let app = build_router(state);

        let (_, created) = send(&app, Method::POST, "/interviews", Some(setup_body("short"))).await;
        let interview_id = created["interview"]["id"].as_i64().unwrap();

        let (status, _) = send(
            &app,
            Method::POST,
            "/answers",
            Some(json!({"interviewId": interview_id, "questionId": 999, "answerText": "hi"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            Method::POST,
            "/answers",
            Some(json!({"interviewId": interview_id, "questionId": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_complete_flow_returns_report() {
        let (state, _) = test_state();
        let app = build_router(state);

        let (_, created) = send(&app, Method::POST, "/interviews", Some(setup_body("short"))).await;
        let interview_id = created["interview"]["id"].as_i64().unwrap();

        let mut total = 0;
        for question in created["questions"].as_array().unwrap() {
            let (_, answer) = send(
                &app,
                Method::POST,
                "/answers",
                Some(json!({
                    "interviewId": interview_id,
                    "questionId": question["id"],
                    "answerText": "An answer with an example."
                })),
            )
            .await;
            total += answer["score"].as_i64().unwrap();
        }

        let (status, completed) = send(
            &app,
            Method::POST,
            &format!("/interviews/{interview_id}/complete"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(completed["answers"].as_array().unwrap().len(), 5);
        assert_eq!(completed["questions"].as_array().unwrap().len(), 5);

        let expected = (total as f64 / 5.0).round() as i64;
        assert_eq!(completed["interview"]["readinessScore"].as_i64(), Some(expected));
        assert!(completed["interview"]["endTime"].is_string());
        assert!(completed["interview"]["categoryScores"].is_object());
    }

    #[tokio::test]
    async fn test_complete_without_questions_is_bad_request() {
        let (state, store) = test_state();
        let app = build_router(state);
        let interview = store
            .create_interview(NewInterview {
                job_role: "QA".to_string(),
                experience_level: ExperienceLevel::Senior,
                target_company: None,
                include_technical: true,
                include_behavioral: false,
                include_company_specific: false,
                interview_length: InterviewLength::Long,
            })
            .await;

        let uri = format!("/interviews/{}/complete", interview.id);
        let (status, _) = send(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(store.get_interview(interview.id).await.unwrap().end_time.is_none());

        let (status, _) = send(&app, Method::POST, "/interviews/0/complete", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&app, Method::POST, "/interviews/404/complete", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_register_user_hides_password() {
        let (state, _) = test_state();
        let app = build_router(state);
        let body = json!({"username": "ada", "password": "hunter2"});

        let (status, user) = send(&app, Method::POST, "/users", Some(body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(user["username"], "ada");
        assert!(user.get("password").is_none());

        let (status, _) = send(&app, Method::POST, "/users", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
