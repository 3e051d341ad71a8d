//! Central module for application-wide configuration settings.
//!
//! Configuration is read once at startup from the environment (with `.env`
//! support handled by the caller) and passed down explicitly; nothing in the
//! application reads environment variables after boot. In particular the two
//! JWT signing secrets are injected into the token codec at construction.

use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {0}")]
    InvalidVar(&'static str),
}

/// Runtime configuration for the backend.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP port the server listens on. `PORT`, defaults to 5000.
    pub port: u16,
    /// Postgres connection string. `DATABASE_URL`, required.
    pub database_url: String,
    /// Secret used to sign and verify access tokens. `JWT_SECRET`, required.
    pub jwt_secret: String,
    /// Secret used to sign and verify refresh tokens. `JWT_REFRESH_SECRET`,
    /// required and independent of `JWT_SECRET`.
    pub jwt_refresh_secret: String,
    /// Allowed CORS origin for the frontend. `FRONTEND_URL`, defaults to
    /// the local dev server.
    pub frontend_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar("PORT"))?,
            Err(_) => 5000,
        };

        Ok(Self {
            port,
            database_url: require("DATABASE_URL")?,
            jwt_secret: require("JWT_SECRET")?,
            jwt_refresh_secret: require("JWT_REFRESH_SECRET")?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}
