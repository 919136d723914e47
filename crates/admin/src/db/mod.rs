//! Database operations for the back-office `PostgreSQL`.
//!
//! ## Tables
//!
//! - `clients` - Customers placing orders
//! - `articles` - Catalog with on-hand stock (`NUMERIC(12,3)`)
//! - `orders` - Sales orders with the user-controlled `priority` sequence
//! - `order_lines` - Ordered articles and quantities
//! - `inventory_operations` - Receptions, exits, adjustments, transfers, fabrication
//! - `inventory_operation_items` - Articles moved by an operation
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p fournil-cli -- migrate
//! ```

pub mod orders;
pub mod snapshot;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use orders::OrderRepository;
pub use snapshot::ProductionSnapshotRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate order in a reorder request).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Classify a read error: undecodable columns (e.g. a negative stored
    /// quantity) are data corruption, everything else is a database error.
    pub(crate) fn from_read(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::ColumnDecode { index, source } => {
                Self::DataCorruption(format!("column {index}: {source}"))
            }
            other => Self::Database(other),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
