//! Handler functions for authentication-related API endpoints.
//!
//! Thin HTTP adapters over [`super::service::AuthService`]: validate the
//! payload, call the service, shape the response. On the refresh endpoint
//! every internal failure kind surfaces as the same generic message.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use crate::errors::AppError;
use crate::state::AppState;

use super::models::{
    AuthResponse, LoginRequest, RefreshTokenRequest, RefreshTokenResponse, RegisterRequest,
};

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    payload.validate()?;

    let (user, pair) = state
        .auth
        .register(payload.username, payload.email, payload.password, payload.role)
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse::new(pair, &user))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let (user, pair) = state.auth.login(&payload.email, &payload.password).await?;

    Ok(Json(AuthResponse::new(pair, &user)))
}

pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<Json<RefreshTokenResponse>, AppError> {
    payload.validate()?;

    let pair = state.auth.refresh(&payload.refresh_token).await?;

    Ok(Json(pair.into()))
}
