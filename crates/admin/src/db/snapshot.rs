//! Consistent read of everything the production summary needs.
//!
//! Orders, stock and running fabrication are read inside one
//! `REPEATABLE READ, READ ONLY` transaction so the allocation never sees stock
//! half-way through a concurrent inventory operation.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::instrument;

use fournil_core::{
    ArticleId, ClientId, InventoryOperationId, OperationStatus, OperationType, OrderId,
    OrderLineId, OrderStatus, Quantity,
};

use super::RepositoryError;
use crate::models::{Article, InventoryOperation, OperationItem, Order, OrderLine};
use crate::services::production::{InventorySnapshot, ProductionSnapshot};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    client_id: i32,
    priority: Option<i32>,
    status: OrderStatus,
    order_date: DateTime<Utc>,
    delivery_date: Option<NaiveDate>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderLineRow {
    id: i32,
    order_id: i32,
    article_id: i32,
    position: i32,
    quantity: Quantity,
}

impl From<OrderLineRow> for OrderLine {
    fn from(row: OrderLineRow) -> Self {
        Self {
            id: OrderLineId::new(row.id),
            order_id: OrderId::new(row.order_id),
            article_id: ArticleId::new(row.article_id),
            position: row.position,
            quantity: row.quantity,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ArticleRow {
    id: i32,
    name: String,
    track_stock: bool,
    current_stock: Quantity,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Self {
            id: ArticleId::new(row.id),
            name: row.name,
            track_stock: row.track_stock,
            current_stock: row.current_stock,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OperationItemRow {
    operation_id: i32,
    operation_type: OperationType,
    status: OperationStatus,
    article_id: i32,
    quantity: Quantity,
}

// =============================================================================
// Repository
// =============================================================================

/// Loads [`ProductionSnapshot`]s.
pub struct ProductionSnapshotRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductionSnapshotRepository<'a> {
    /// Create a new snapshot repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Read active orders, stock and in-progress fabrication in one snapshot.
    ///
    /// Orders whose status is in `excluded` are not loaded. Only articles
    /// referenced by a loaded order line are read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if a stored quantity is
    /// negative or too precise, `RepositoryError::Database` for any other
    /// failure. Either way nothing is returned.
    #[instrument(skip(self))]
    pub async fn load(&self, excluded: &[OrderStatus]) -> Result<ProductionSnapshot, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let excluded: Vec<String> = excluded.iter().map(ToString::to_string).collect();
        let order_rows: Vec<OrderRow> = sqlx::query_as(
            r"
            SELECT id, client_id, priority, status, order_date, delivery_date
            FROM orders
            WHERE status::text <> ALL($1)
            ORDER BY COALESCE(priority, 0), id
            ",
        )
        .bind(excluded.as_slice())
        .fetch_all(&mut *tx)
        .await
        .map_err(RepositoryError::from_read)?;

        let order_ids: Vec<i32> = order_rows.iter().map(|o| o.id).collect();
        let line_rows: Vec<OrderLineRow> = sqlx::query_as(
            r"
            SELECT id, order_id, article_id, position, quantity
            FROM order_lines
            WHERE order_id = ANY($1)
            ORDER BY order_id, position, id
            ",
        )
        .bind(order_ids.as_slice())
        .fetch_all(&mut *tx)
        .await
        .map_err(RepositoryError::from_read)?;

        let mut article_ids: Vec<i32> = line_rows.iter().map(|l| l.article_id).collect();
        article_ids.sort_unstable();
        article_ids.dedup();

        let article_rows: Vec<ArticleRow> = sqlx::query_as(
            r"
            SELECT id, name, track_stock, current_stock
            FROM articles
            WHERE id = ANY($1)
            ",
        )
        .bind(article_ids.as_slice())
        .fetch_all(&mut *tx)
        .await
        .map_err(RepositoryError::from_read)?;

        let item_rows: Vec<OperationItemRow> = sqlx::query_as(
            r"
            SELECT o.id AS operation_id, o.operation_type, o.status, i.article_id, i.quantity
            FROM inventory_operations o
            JOIN inventory_operation_items i ON i.operation_id = o.id
            WHERE o.operation_type = 'fabrication'
              AND o.status = 'en_cours'
              AND i.article_id = ANY($1)
            ORDER BY o.id, i.id
            ",
        )
        .bind(article_ids.as_slice())
        .fetch_all(&mut *tx)
        .await
        .map_err(RepositoryError::from_read)?;

        tx.commit().await?;

        tracing::debug!(
            orders = order_rows.len(),
            lines = line_rows.len(),
            articles = article_rows.len(),
            fabrication_items = item_rows.len(),
            "production snapshot loaded"
        );

        let orders = assemble_orders(order_rows, line_rows);
        let articles: Vec<Article> = article_rows.into_iter().map(Into::into).collect();
        let operations = assemble_operations(item_rows);

        Ok(ProductionSnapshot {
            orders,
            inventory: InventorySnapshot::from_records(&articles, &operations),
        })
    }
}

fn assemble_orders(order_rows: Vec<OrderRow>, line_rows: Vec<OrderLineRow>) -> Vec<Order> {
    let mut lines_by_order: HashMap<i32, Vec<OrderLine>> = HashMap::new();
    for row in line_rows {
        lines_by_order
            .entry(row.order_id)
            .or_default()
            .push(row.into());
    }

    order_rows
        .into_iter()
        .map(|row| Order {
            id: OrderId::new(row.id),
            client_id: ClientId::new(row.client_id),
            priority: row.priority,
            status: row.status,
            order_date: row.order_date,
            delivery_date: row.delivery_date,
            lines: lines_by_order.remove(&row.id).unwrap_or_default(),
        })
        .collect()
}

fn assemble_operations(item_rows: Vec<OperationItemRow>) -> Vec<InventoryOperation> {
    let mut operations: BTreeMap<i32, InventoryOperation> = BTreeMap::new();
    for row in item_rows {
        operations
            .entry(row.operation_id)
            .or_insert_with(|| InventoryOperation {
                id: InventoryOperationId::new(row.operation_id),
                operation_type: row.operation_type,
                status: row.status,
                items: Vec::new(),
            })
            .items
            .push(OperationItem {
                article_id: ArticleId::new(row.article_id),
                quantity: row.quantity,
            });
    }
    operations.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_row(id: i32, order_id: i32, article_id: i32) -> OrderLineRow {
        OrderLineRow {
            id,
            order_id,
            article_id,
            position: id,
            quantity: Quantity::from_units(1),
        }
    }

    #[test]
    fn test_assemble_orders_attaches_lines() {
        let orders = assemble_orders(
            vec![
                OrderRow {
                    id: 1,
                    client_id: 5,
                    priority: Some(2),
                    status: OrderStatus::Confirmed,
                    order_date: DateTime::<Utc>::default(),
                    delivery_date: None,
                },
                OrderRow {
                    id: 2,
                    client_id: 6,
                    priority: None,
                    status: OrderStatus::Draft,
                    order_date: DateTime::<Utc>::default(),
                    delivery_date: None,
                },
            ],
            vec![line_row(10, 1, 100), line_row(11, 1, 101), line_row(12, 3, 102)],
        );

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].lines.len(), 2);
        assert!(orders[1].lines.is_empty());
        assert_eq!(orders[0].client_id, ClientId::new(5));
    }

    #[test]
    fn test_assemble_operations_groups_items() {
        let row = |operation_id, article_id| OperationItemRow {
            operation_id,
            operation_type: OperationType::Fabrication,
            status: OperationStatus::EnCours,
            article_id,
            quantity: Quantity::from_units(2),
        };
        let operations = assemble_operations(vec![row(3, 1), row(3, 2), row(1, 1)]);

        assert_eq!(operations.len(), 2);
        assert_eq!(operations[0].id, InventoryOperationId::new(1));
        assert_eq!(operations[1].items.len(), 2);
        assert!(operations.iter().all(InventoryOperation::is_in_progress_fabrication));
    }
}
