//! Core business logic for the authentication system.
//!
//! Turns credential checks into token pairs and rotates refresh tokens.
//! Issuance is destructive by design: every pair replaces all previously
//! stored refresh tokens for the user, so logging in from a second device
//! invalidates the first, and every refresh consumes the token it was
//! called with. Concurrent issuance for one user races last-writer-wins.

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::database::models::{NewUser, Role, User};
use crate::database::queries::{RefreshTokenStore, UserStore};
use crate::errors::AppError;

use super::errors::AuthError;
use super::models::TokenPair;
use super::token::{TokenCodec, TOKEN_TTL_SECS};

#[derive(Clone)]
pub struct AuthService {
    codec: TokenCodec,
    users: Arc<dyn UserStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
}

impl AuthService {
    pub fn new(
        codec: TokenCodec,
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
    ) -> Self {
        Self {
            codec,
            users,
            refresh_tokens,
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Creates the account and signs it in.
    pub async fn register(
        &self,
        username: String,
        email: String,
        password: String,
        role: Role,
    ) -> Result<(User, TokenPair), AppError> {
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
        let user = self
            .users
            .insert(NewUser {
                username,
                email,
                password_hash,
                role,
            })
            .await?;

        let pair = self.issue_pair(&user).await?;
        tracing::info!(user_id = %user.id, "user registered");
        Ok((user, pair))
    }

    /// Checks the credential and signs the user in. Unknown email and wrong
    /// password collapse into the same failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair), AppError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::warn!(%email, "failed login attempt");
            return Err(AppError::BadRequest("Invalid credentials".to_string()));
        };
        if !bcrypt::verify(password, &user.password_hash)? {
            tracing::warn!(%email, "failed login attempt");
            return Err(AppError::BadRequest("Invalid credentials".to_string()));
        }

        let pair = self.issue_pair(&user).await?;
        tracing::info!(user_id = %user.id, "user logged in");
        Ok((user, pair))
    }

    /// Mints an access/refresh pair and rotates the stored refresh token:
    /// all prior tokens for the user are deleted before the new one is
    /// inserted.
    pub async fn issue_pair(&self, user: &User) -> Result<TokenPair, AppError> {
        let access_token = self.codec.sign_access(user.id, user.role)?;
        let refresh_token = self.codec.sign_refresh(user.id)?;

        let expires_at = Utc::now() + Duration::seconds(TOKEN_TTL_SECS);
        self.refresh_tokens
            .replace_for_user(user.id, &refresh_token, expires_at)
            .await?;

        tracing::info!(user_id = %user.id, "refresh token rotated");
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Exchanges a presented refresh token for a new pair. The presented
    /// token is consumed: issuing the new pair deletes it from the store.
    /// The user record is re-read, so the new access token carries the
    /// current role, not the role at original issuance.
    pub async fn refresh(&self, presented: &str) -> Result<TokenPair, AppError> {
        let record = self
            .refresh_tokens
            .find(presented)
            .await?
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        if record.expires_at < Utc::now() {
            tracing::warn!(user_id = %record.user_id, "expired refresh token presented");
            return Err(AuthError::InvalidOrExpiredToken.into());
        }

        let claims = self
            .codec
            .verify_refresh(presented)
            .map_err(|_| AuthError::InvalidOrExpiredToken)?;

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let pair = self.issue_pair(&user).await?;
        tracing::info!(user_id = %user.id, "token refreshed");
        Ok(pair)
    }
}
