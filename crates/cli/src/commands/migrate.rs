//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! cartapp-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `CARTAPP_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! Migrations are embedded from `crates/server/migrations/` at build time.

use thiserror::Error;

use cartapp_server::config::{ConfigError, ServerConfig};
use cartapp_server::db;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending migrations against the configured database.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the database is unreachable,
/// or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let config = ServerConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
