//! Production summary engine.
//!
//! Given every active order competing for the same warehouse stock, computes
//! per order line how much is picked from stock, how much running fabrication
//! already covers, and how much still has to be produced.
//!
//! # Pipeline
//!
//! ```text
//! ProductionSnapshot ─► aggregator ─► allocation ─► classifier ─► report
//!  (one DB read)        (precedence)  (pick, cover)  (status)     (filter, shape)
//! ```
//!
//! The whole computation is synchronous and holds its counters in
//! request-scoped memory. The only I/O is loading the snapshot, which
//! [`load_plan`] does inside a single read-only transaction.

pub mod aggregator;
pub mod allocation;
pub mod classifier;
pub mod plan;
pub mod report;
pub mod snapshot;

use sqlx::PgPool;
use thiserror::Error;

use fournil_core::{OrderId, OrderStatus};

use crate::db::{ProductionSnapshotRepository, RepositoryError};

pub use allocation::{AllocationRow, allocate};
pub use classifier::{classify_order, line_availability};
pub use plan::ProductionPlan;
pub use report::{
    ArticleSummary, DateFilter, GroupBy, OrderDetail, OrderSummary, SummaryFilter, SummaryView,
};
pub use snapshot::{InventoryLookup, InventorySnapshot, ProductionSnapshot};

/// Errors from the production summary.
#[derive(Debug, Error)]
pub enum ProductionError {
    /// The stock/production snapshot could not be read; nothing was computed.
    #[error("failed to read inventory snapshot: {0}")]
    SnapshotReadFailure(#[from] RepositoryError),

    /// The order is unknown or not part of the active set.
    #[error("order {0} is not an active order")]
    UnknownOrder(OrderId),

    /// Caller filter could not be understood.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
}

/// Load a consistent snapshot and compute the production plan.
///
/// # Errors
///
/// Returns `ProductionError::SnapshotReadFailure` if any part of the
/// snapshot fails to load. No partial plan is ever returned.
#[tracing::instrument(skip(pool))]
pub async fn load_plan(
    pool: &PgPool,
    excluded: &[OrderStatus],
) -> Result<ProductionPlan, ProductionError> {
    let snapshot = ProductionSnapshotRepository::new(pool)
        .load(excluded)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "production snapshot read failed"))?;

    Ok(ProductionPlan::compute(snapshot, excluded))
}
