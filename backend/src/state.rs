//! Shared application state handed to every handler.

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::service::AuthService;
use crate::auth::token::TokenCodec;
use crate::config::Config;
use crate::database::queries::{
    PgRefreshTokenStore, PgTaskStore, PgUserStore, TaskStore, UserStore,
};

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
}

impl AppState {
    pub fn new(config: &Config, pool: PgPool) -> Self {
        let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool.clone()));
        let refresh_tokens = Arc::new(PgRefreshTokenStore::new(pool.clone()));
        let codec = TokenCodec::new(&config.jwt_secret, &config.jwt_refresh_secret);

        Self {
            auth: AuthService::new(codec, users.clone(), refresh_tokens),
            users,
            tasks: Arc::new(PgTaskStore::new(pool)),
        }
    }

    /// State backed by in-memory stores; used by router tests.
    #[cfg(test)]
    pub fn for_tests() -> (Self, Arc<crate::database::memory::MemoryUserStore>) {
        use crate::database::memory::{
            MemoryRefreshTokenStore, MemoryTaskStore, MemoryUserStore,
        };

        let users = Arc::new(MemoryUserStore::new());
        let refresh_tokens = Arc::new(MemoryRefreshTokenStore::new());
        let codec = TokenCodec::new("test-access-secret", "test-refresh-secret");

        let state = Self {
            auth: AuthService::new(codec, users.clone(), refresh_tokens),
            users: users.clone(),
            tasks: Arc::new(MemoryTaskStore::new(users.clone())),
        };
        (state, users)
    }
}
