//! Middleware for protecting authenticated routes and handling authorization.
//!
//! Two stages. `authenticate` runs as router middleware: it verifies the
//! bearer token against the access secret and attaches the caller's
//! identity to the request. The extractors below read that identity;
//! [`Manager`] additionally enforces the manager role. Neither stage ever
//! consults the refresh-token store: access tokens are self-contained and
//! stay valid until their embedded expiry.

use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::database::models::Role;
use crate::state::AppState;

use super::errors::AuthError;

/// The verified caller, attached to request extensions by [`authenticate`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

/// Stage one: verify the bearer token and attach the caller's identity.
/// Absent, malformed, invalid, and expired tokens all yield the same 401.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(req.headers()).ok_or_else(|| {
        tracing::warn!("no token provided");
        AuthError::Unauthenticated
    })?;

    let claims = state.auth.codec().verify_access(token).map_err(|err| {
        tracing::warn!(error = %err, "invalid access token");
        AuthError::Unauthenticated
    })?;

    req.extensions_mut().insert(AuthUser {
        id: claims.sub,
        role: claims.role,
    });

    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::Unauthenticated)
    }
}

/// Stage two: requires the identity attached by stage one to carry the
/// manager role. Has no verification path of its own.
#[derive(Debug, Clone)]
pub struct Manager(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for Manager
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Manager {
            tracing::warn!(user_id = %user.id, "unauthorized access attempt");
            return Err(AuthError::Forbidden);
        }
        Ok(Manager(user))
    }
}
