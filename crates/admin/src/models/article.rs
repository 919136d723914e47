//! Article (catalog item) domain model.

use serde::{Deserialize, Serialize};

use fournil_core::{ArticleId, Quantity};

/// A catalog article with its on-hand stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Unique article ID.
    pub id: ArticleId,
    /// Display name.
    pub name: String,
    /// Whether on-hand stock is tracked. Untracked articles are made to order.
    pub track_stock: bool,
    /// Current on-hand quantity.
    pub current_stock: Quantity,
}

impl Article {
    /// Stock the production summary may allocate from.
    #[must_use]
    pub fn allocatable_stock(&self) -> Quantity {
        if self.track_stock {
            self.current_stock
        } else {
            Quantity::ZERO
        }
    }
}
