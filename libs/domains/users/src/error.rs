use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_helpers::ErrorResponse;
use domain_notifications::NotificationError;
use thiserror::Error;
use uuid::Uuid;

/// Message rendered for every credential failure during login.
///
/// Unknown phone number and wrong password must be indistinguishable to
/// the caller.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid phone number or password";

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("No user found with phone number '{0}'")]
    PhoneNotFound(String),

    #[error("Phone number '{0}' is already in use")]
    AlreadyExists(String),

    #[error("No OTP was issued for this user")]
    OtpNotFound,

    #[error("OTP has expired")]
    OtpExpired,

    #[error("Invalid OTP")]
    OtpInvalid,

    // Must stay in sync with INVALID_CREDENTIALS_MESSAGE.
    #[error("Invalid phone number or password")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("SMS delivery failed: {0}")]
    Delivery(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<NotificationError> for UserError {
    fn from(err: NotificationError) -> Self {
        UserError::Delivery(err.to_string())
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            UserError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("User {} not found", id),
            ),
            UserError::PhoneNotFound(phone) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("No user found with phone number '{}'", phone),
            ),
            UserError::AlreadyExists(phone) => (
                StatusCode::CONFLICT,
                "duplicate",
                format!("Phone number '{}' is already in use", phone),
            ),
            UserError::OtpNotFound => (
                StatusCode::BAD_REQUEST,
                "otp_not_found",
                "No OTP was issued for this user".to_string(),
            ),
            UserError::OtpExpired => (
                StatusCode::BAD_REQUEST,
                "otp_expired",
                "OTP has expired".to_string(),
            ),
            UserError::OtpInvalid => (
                StatusCode::BAD_REQUEST,
                "otp_invalid",
                "Invalid OTP".to_string(),
            ),
            UserError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                INVALID_CREDENTIALS_MESSAGE.to_string(),
            ),
            UserError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            UserError::PasswordHash(msg) => {
                tracing::error!("Password hash error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            UserError::Delivery(msg) => {
                tracing::error!("SMS delivery error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "delivery_error",
                    format!("SMS delivery failed: {}", msg),
                )
            }
            UserError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse::new(error_type, message)),
        )
            .into_response()
    }
}
