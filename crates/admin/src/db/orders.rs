//! Order priority persistence.

use std::collections::HashSet;

use sqlx::PgPool;
use tracing::instrument;

use fournil_core::OrderId;

use super::RepositoryError;

/// Repository for order fields the back office edits directly.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new fulfillment sequence.
    ///
    /// `ids[0]` gets priority 1, `ids[1]` priority 2, and so on. Orders not
    /// listed keep their priority. Either every order is updated or none is.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if an ID appears twice.
    /// Returns `RepositoryError::NotFound` if an ID matches no order.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self), fields(count = ids.len()))]
    pub async fn reorder(&self, ids: &[OrderId]) -> Result<(), RepositoryError> {
        if let Some(duplicate) = first_duplicate(ids) {
            return Err(RepositoryError::Conflict(format!(
                "order {duplicate} listed more than once"
            )));
        }

        let mut tx = self.pool.begin().await?;
        for (priority, id) in (1_i32..).zip(ids) {
            let result = sqlx::query(
                r"
                UPDATE orders
                SET priority = $1, updated_at = now()
                WHERE id = $2
                ",
            )
            .bind(priority)
            .bind(id.as_i32())
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                tracing::warn!(order_id = %id, "reorder references a missing order");
                return Err(RepositoryError::NotFound);
            }
        }
        tx.commit().await?;

        tracing::info!("order priorities updated");
        Ok(())
    }
}

fn first_duplicate(ids: &[OrderId]) -> Option<OrderId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().find(|id| !seen.insert(*id))
}
