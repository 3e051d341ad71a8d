//! General-purpose middleware for the API.
//!
//! Cross-cutting tower layers applied to the whole router: CORS for the
//! frontend origin and per-request tracing. Route protection lives in
//! [`crate::auth::middleware`].

use axum::http::header::{InvalidHeaderValue, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;

/// Allows the configured frontend origin, with credentials, for the verbs
/// and headers the API actually uses.
pub fn cors(config: &Config) -> Result<CorsLayer, InvalidHeaderValue> {
    let origin: HeaderValue = config.frontend_url.parse()?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]))
}

pub fn trace() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}
