//! Integration tests for the Fournil back office.
//!
//! # Running Tests
//!
//! ```bash
//! # Scenario tests (no database needed)
//! cargo test -p fournil-integration-tests
//!
//! # Database-backed tests
//! FOURNIL_DATABASE_URL=postgres://... cargo test -p fournil-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `production_summary` - Allocation properties over in-memory snapshots
//! - `snapshot_repository` - Snapshot loading and reordering against `PostgreSQL`
//!
//! This library holds the fixture builders shared by those tests.

use chrono::{DateTime, Utc};

use fournil_admin::models::{Article, InventoryOperation, OperationItem, Order, OrderLine};
use fournil_admin::services::production::{InventorySnapshot, ProductionSnapshot};
use fournil_core::{
    ArticleId, ClientId, InventoryOperationId, OperationStatus, OperationType, OrderId,
    OrderLineId, OrderStatus, Quantity,
};

/// Builds one order with its lines.
#[derive(Debug, Clone)]
pub struct OrderBuilder {
    order: Order,
}

impl OrderBuilder {
    /// A confirmed order for client 1, without priority or lines.
    #[must_use]
    pub fn new(id: i32, order_date: DateTime<Utc>) -> Self {
        Self {
            order: Order {
                id: OrderId::new(id),
                client_id: ClientId::new(1),
                priority: None,
                status: OrderStatus::Confirmed,
                order_date,
                delivery_date: None,
                lines: Vec::new(),
            },
        }
    }

    #[must_use]
    pub const fn priority(mut self, priority: i32) -> Self {
        self.order.priority = Some(priority);
        self
    }

    #[must_use]
    pub const fn client(mut self, client_id: i32) -> Self {
        self.order.client_id = ClientId::new(client_id);
        self
    }

    #[must_use]
    pub const fn status(mut self, status: OrderStatus) -> Self {
        self.order.status = status;
        self
    }

    /// Append a line; positions and line IDs follow insertion order.
    #[must_use]
    pub fn line(mut self, article_id: i32, quantity: Quantity) -> Self {
        let position = i32::try_from(self.order.lines.len()).unwrap_or(i32::MAX);
        self.order.lines.push(OrderLine {
            id: OrderLineId::new(self.order.id.as_i32() * 1000 + position),
            order_id: self.order.id,
            article_id: ArticleId::new(article_id),
            position,
            quantity,
        });
        self
    }

    #[must_use]
    pub fn build(self) -> Order {
        self.order
    }
}

/// Builds a [`ProductionSnapshot`] from articles, running fabrication and
/// orders.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    orders: Vec<Order>,
    articles: Vec<Article>,
    operations: Vec<InventoryOperation>,
}

impl SnapshotBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A stock-tracked article.
    #[must_use]
    pub fn article(mut self, id: i32, stock: Quantity) -> Self {
        self.articles.push(Article {
            id: ArticleId::new(id),
            name: format!("Article {id}"),
            track_stock: true,
            current_stock: stock,
        });
        self
    }

    /// An article whose stock is not tracked.
    #[must_use]
    pub fn untracked_article(mut self, id: i32, stock: Quantity) -> Self {
        self.articles.push(Article {
            id: ArticleId::new(id),
            name: format!("Article {id}"),
            track_stock: false,
            current_stock: stock,
        });
        self
    }

    /// One inventory operation with a single item.
    #[must_use]
    pub fn operation(
        mut self,
        operation_type: OperationType,
        status: OperationStatus,
        article_id: i32,
        quantity: Quantity,
    ) -> Self {
        let id = i32::try_from(self.operations.len() + 1).unwrap_or(i32::MAX);
        self.operations.push(InventoryOperation {
            id: InventoryOperationId::new(id),
            operation_type,
            status,
            items: vec![OperationItem {
                article_id: ArticleId::new(article_id),
                quantity,
            }],
        });
        self
    }

    /// A fabrication currently in progress.
    #[must_use]
    pub fn fabrication(self, article_id: i32, quantity: Quantity) -> Self {
        self.operation(
            OperationType::Fabrication,
            OperationStatus::EnCours,
            article_id,
            quantity,
        )
    }

    #[must_use]
    pub fn order(mut self, order: OrderBuilder) -> Self {
        self.orders.push(order.build());
        self
    }

    #[must_use]
    pub fn build(self) -> ProductionSnapshot {
        ProductionSnapshot {
            orders: self.orders,
            inventory: InventorySnapshot::from_records(&self.articles, &self.operations),
        }
    }
}

/// Whole units as a quantity.
#[must_use]
pub fn units(n: u32) -> Quantity {
    Quantity::from_units(n)
}
