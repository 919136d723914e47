//! Inventory operation domain models.

use serde::{Deserialize, Serialize};

use fournil_core::{ArticleId, InventoryOperationId, OperationStatus, OperationType, Quantity};

/// An inventory operation and the articles it moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryOperation {
    /// Unique operation ID.
    pub id: InventoryOperationId,
    /// Kind of operation.
    pub operation_type: OperationType,
    /// Processing status.
    pub status: OperationStatus,
    /// Articles and quantities.
    pub items: Vec<OperationItem>,
}

impl InventoryOperation {
    /// Whether this operation is running fabrication that will yield stock.
    #[must_use]
    pub fn is_in_progress_fabrication(&self) -> bool {
        self.operation_type == OperationType::Fabrication
            && self.status == OperationStatus::EnCours
    }
}

/// One article line of an inventory operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationItem {
    /// Article moved.
    pub article_id: ArticleId,
    /// Quantity moved.
    pub quantity: Quantity,
}
