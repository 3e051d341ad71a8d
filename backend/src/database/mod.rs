//! Module for database connection setup and common utilities.
//!
//! Initializes the Postgres pool and runs the embedded migrations. Row
//! models live in [`models`], the store traits and their Postgres
//! implementations in [`queries`].

pub mod models;
pub mod queries;

#[cfg(test)]
pub mod memory;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("database connected");
    Ok(pool)
}
