//! Database migration command.
//!
//! Migrations live in `crates/admin/migrations/` and are embedded at compile
//! time.
//!
//! # Environment Variables
//!
//! - `FOURNIL_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)

use fournil_admin::config::{AdminConfig, ConfigError};
use fournil_admin::db;

/// Errors from running migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run the back-office database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database URL is missing, the connection
/// fails or a migration fails to apply.
pub async fn run() -> Result<(), MigrationError> {
    let config = AdminConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../admin/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
