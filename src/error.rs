//! Error handling module
//!
//! Provides the unified error type returned by every handler and middleware,
//! and its mapping onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {context}: {details}")]
    Internal { context: String, details: String },
}

/// Error response body: `{"error": "..."}` with details only on 500s.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::Authentication(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            AppError::Authorization(msg) => (StatusCode::FORBIDDEN, msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            // Conflicts are reported as 400, not 409, per the public API contract.
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::Internal { context, details } => {
                error!("Internal error: {}: {}", context, details);
                (StatusCode::INTERNAL_SERVER_ERROR, context, Some(details))
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

/// Helper function to create a validation error
pub fn validation_error(msg: impl Into<String>) -> AppError {
    AppError::Validation(msg.into())
}

/// Helper function to create a not found error
pub fn not_found_error(msg: impl Into<String>) -> AppError {
    AppError::NotFound(msg.into())
}

/// Helper function to wrap an unexpected failure with a user-facing context
pub fn internal_error(context: impl Into<String>, err: impl std::fmt::Display) -> AppError {
    AppError::Internal {
        context: context.into(),
        details: err.to_string(),
    }
}
