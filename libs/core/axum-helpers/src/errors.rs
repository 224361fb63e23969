//! Structured error responses shared by API handlers.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JSON body returned for every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Short machine-readable error kind, e.g. "not_found".
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Optional structured details (e.g. per-field validation errors).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }
}

/// Fallback handler for unmatched routes.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("not_found", "Resource not found")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_serializes_without_empty_details() {
        let response = ErrorResponse::new("not_found", "Resource not found");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("not_found"));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_error_response_with_details() {
        let mut response = ErrorResponse::new("validation_error", "Request validation failed");
        response.details = Some(serde_json::json!({"phone_number": ["too short"]}));
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("details"));
        assert!(json.contains("phone_number"));
    }
}
