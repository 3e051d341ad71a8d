//! Stateless signing and verification of access and refresh tokens.
//!
//! Two independent HS256 secrets back the two token kinds; a token signed
//! for one kind never verifies as the other. Verification is pure: no
//! clock leeway, no I/O, validity determined entirely by signature plus
//! embedded expiry. Refresh claims deliberately carry no role, so a stale
//! refresh token can never smuggle an outdated role past a later refresh.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::Role;

use super::errors::AuthError;

/// Lifetime of both token kinds. The access window matching the refresh
/// window is inherited from the original service and kept as-is.
pub const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Payload of an access token: identity plus role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Payload of a refresh token: identity only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenCodec {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
}

impl TokenCodec {
    pub fn new(access_secret: &str, refresh_secret: &str) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
        }
    }

    pub fn sign_access(&self, user_id: Uuid, role: Role) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user_id,
            role,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(TOKEN_TTL_SECS)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.access_encoding)
            .map_err(|_| AuthError::TokenCreation)
    }

    pub fn sign_refresh(&self, user_id: Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(TOKEN_TTL_SECS)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.refresh_encoding)
            .map_err(|_| AuthError::TokenCreation)
    }

    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, AuthError> {
        decode::<AccessClaims>(token, &self.access_decoding, &validation())
            .map(|data| data.claims)
            .map_err(classify)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, AuthError> {
        decode::<RefreshClaims>(token, &self.refresh_decoding, &validation())
            .map(|data| data.claims)
            .map_err(classify)
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation
}

/// Expiry is the only failure distinguished internally; everything else
/// (wrong secret, tampering, missing claim) is an invalid signature.
fn classify(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        _ => AuthError::InvalidSignature,
    }
}
