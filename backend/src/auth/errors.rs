//! Custom error types specific to authentication failures.
//!
//! The internal taxonomy is deliberately finer than what callers see on the
//! wire: the guard collapses every stage-one failure into the same 401
//! response, and the refresh path collapses signature and expiry failures
//! into one generic message, so a client can never tell which check failed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Token signature did not verify against the expected secret, or the
    /// payload was missing a required claim.
    #[error("invalid token signature")]
    InvalidSignature,

    /// Token signature verified but the embedded expiry has elapsed.
    #[error("token expired")]
    Expired,

    /// Presented refresh token is unknown to the store or past its stored
    /// expiry. Collapses not-found and expired on purpose.
    #[error("invalid or expired refresh token")]
    InvalidOrExpiredToken,

    /// The user a refresh token points at no longer exists.
    #[error("user not found")]
    UserNotFound,

    /// Missing, malformed, invalid, or expired bearer credential. All
    /// stage-one guard failures surface as this one kind.
    #[error("unauthenticated")]
    Unauthenticated,

    /// Authenticated, but the role does not permit the operation.
    #[error("forbidden")]
    Forbidden,

    /// Signing failed. Should not happen with well-formed secrets.
    #[error("token creation failed")]
    TokenCreation,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // Codec-level kinds never escape the guard or the refresh path
            // with their own message; collapse them if they ever do.
            AuthError::Unauthenticated | AuthError::InvalidSignature | AuthError::Expired => {
                (StatusCode::UNAUTHORIZED, "Invalid token")
            }
            AuthError::InvalidOrExpiredToken => {
                (StatusCode::UNAUTHORIZED, "Invalid or expired refresh token")
            }
            AuthError::UserNotFound => (StatusCode::BAD_REQUEST, "Invalid user"),
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "Access restricted to managers"),
            AuthError::TokenCreation => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
