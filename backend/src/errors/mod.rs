//! Global application error types and handlers.
//!
//! Every handler returns `Result<_, AppError>`. The `IntoResponse` impl is
//! the single place where errors become HTTP responses, always as a JSON
//! `{"message": ...}` body. Infrastructure failures (database, hashing) are
//! logged with their detail and surfaced as a bare 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::auth::errors::AuthError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("password hashing error")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("validation failed")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Auth(err) => return err.into_response(),
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Hash(err) => {
                tracing::error!(error = %err, "password hashing error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Validation(errors) => {
                let message = format_validation_errors(&errors);
                tracing::warn!(%message, "validation error");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Conflict(message) => (StatusCode::BAD_REQUEST, message),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Forbidden(message) => (StatusCode::FORBIDDEN, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Joins every field failure into one comma-separated message, the same
/// shape the API has always returned for invalid payloads.
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = Vec::new();
    for (field, failures) in errors.field_errors() {
        for failure in failures {
            match &failure.message {
                Some(message) => parts.push(message.to_string()),
                None => parts.push(format!("{field} is invalid")),
            }
        }
    }
    parts.sort();
    parts.join(", ")
}
