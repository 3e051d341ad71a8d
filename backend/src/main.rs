//! Main entry point for the task-manager backend.
//!
//! Initializes tracing, loads configuration from the environment, connects
//! to Postgres, and serves the API: public authentication routes under
//! `/api/auth`, guarded task and user routes under `/api/tasks` and
//! `/api/users`.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod middleware;
mod state;

use std::net::SocketAddr;

use axum::Router;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

/// Assembles the full application router. Split out from `main` so router
/// tests can drive the exact production routing and middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api/auth", auth::routes::router())
        .nest("/api/tasks", api::task::routes::router(state.clone()))
        .nest("/api/users", api::user::routes::router(state.clone()))
        .layer(middleware::trace())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = database::connect(&config.database_url).await?;
    let state = AppState::new(&config, pool);
    let app = app(state).layer(middleware::cors(&config)?);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("server running on port {}", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
