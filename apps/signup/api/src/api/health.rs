//! Application-specific readiness handler.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Readiness check endpoint.
///
/// The user store and OTP store live in process memory, so the service
/// is ready as soon as it can answer; the handler reports what it is
/// backed by rather than probing external dependencies.
pub async fn ready_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "repository": "in-memory",
            "environment": format!("{:?}", state.config.environment),
        })),
    )
}
