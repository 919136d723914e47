//! Sales order domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use fournil_core::{ArticleId, ClientId, OrderId, OrderLineId, OrderStatus, Quantity};

/// A sales order with its lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Client who placed the order.
    pub client_id: ClientId,
    /// User-adjustable fulfillment sequence. Lower is served first; `None`
    /// behaves as 0.
    pub priority: Option<i32>,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// When the order was taken.
    pub order_date: DateTime<Utc>,
    /// Requested delivery day.
    pub delivery_date: Option<NaiveDate>,
    /// Lines in display order.
    pub lines: Vec<OrderLine>,
}

impl Order {
    /// Sort key used for fulfillment precedence: priority, then ID.
    #[must_use]
    pub fn precedence_key(&self) -> (i32, OrderId) {
        (self.priority.unwrap_or(0), self.id)
    }
}

/// A single article demanded by an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    /// Unique line ID.
    pub id: OrderLineId,
    /// Order this line belongs to.
    pub order_id: OrderId,
    /// Article demanded.
    pub article_id: ArticleId,
    /// Position within the order.
    pub position: i32,
    /// Ordered quantity.
    pub quantity: Quantity,
}
