//! Defines the HTTP routes specifically for authentication.
//!
//! These endpoints are public; everything else in the API sits behind the
//! [`super::middleware::authenticate`] guard.

use axum::routing::post;
use axum::Router;

use crate::state::AppState;

use super::handlers;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh-token", post(handlers::refresh_token))
}
