use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, ErrorCode, ErrorResponse};
use mediator::{FieldError, RequestError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("User {0} already exists")]
    AlreadyExists(Uuid),

    #[error("Request validation failed")]
    Validation(Vec<FieldError>),

    #[error("User store temporarily unavailable: {0}")]
    Unavailable(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl RequestError for UserError {
    fn validation(failures: Vec<FieldError>) -> Self {
        UserError::Validation(failures)
    }

    fn cancelled() -> Self {
        UserError::Cancelled
    }

    fn unhandled(request_name: &'static str) -> Self {
        UserError::Internal(format!("No handler registered for '{request_name}'"))
    }

    fn is_transient(&self) -> bool {
        matches!(self, UserError::Unavailable(_))
    }
}

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => AppError::NotFound(format!("User {id} not found")),
            UserError::DuplicateEmail(email) => {
                AppError::Conflict(format!("User with email '{email}' already exists"))
            }
            UserError::AlreadyExists(id) => {
                AppError::Conflict(format!("User {id} already exists"))
            }
            UserError::Validation(_) => AppError::BadRequest("Request validation failed".into()),
            UserError::Unavailable(msg) => AppError::ServiceUnavailable(msg),
            UserError::Cancelled => AppError::ServiceUnavailable("Request cancelled".into()),
            UserError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        match self {
            // Keep the per-field detail that AppError would flatten away
            UserError::Validation(failures) => {
                let details = serde_json::to_value(&failures)
                    .unwrap_or(serde_json::Value::Null);
                let body = ErrorResponse::new(ErrorCode::ValidationError, "Request validation failed")
                    .with_details(details);
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            other => {
                let app_error: AppError = other.into();
                app_error.into_response()
            }
        }
    }
}
