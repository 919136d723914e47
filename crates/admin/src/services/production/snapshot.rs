//! Point-in-time inputs of the production summary.

use std::collections::HashMap;

use fournil_core::{ArticleId, Quantity};

use crate::models::{Article, InventoryOperation, Order};

/// Read access to on-hand stock and running fabrication, per article.
///
/// `None` means the article is unknown to the snapshot (deleted, or never
/// existed). The allocation engine treats unknown articles as having zero
/// stock and zero production.
pub trait InventoryLookup {
    /// Current allocatable stock of an article.
    fn current_stock(&self, article_id: ArticleId) -> Option<Quantity>;

    /// Quantity pledged by `en_cours` fabrication operations for an article.
    fn in_progress_production(&self, article_id: ArticleId) -> Option<Quantity>;
}

/// Stock levels and in-progress production taken from one consistent read.
#[derive(Debug, Clone, Default)]
pub struct InventorySnapshot {
    stock: HashMap<ArticleId, Quantity>,
    in_production: HashMap<ArticleId, Quantity>,
    names: HashMap<ArticleId, String>,
}

impl InventorySnapshot {
    /// Build a snapshot from article records and inventory operations.
    ///
    /// Operations other than `en_cours` fabrication are ignored.
    #[must_use]
    pub fn from_records(articles: &[Article], operations: &[InventoryOperation]) -> Self {
        let mut snapshot = Self::default();

        for article in articles {
            snapshot
                .stock
                .insert(article.id, article.allocatable_stock());
            snapshot.names.insert(article.id, article.name.clone());
        }

        for operation in operations
            .iter()
            .filter(|op| op.is_in_progress_fabrication())
        {
            for item in &operation.items {
                *snapshot.in_production.entry(item.article_id).or_default() += item.quantity;
            }
        }

        snapshot
    }

    /// Display name of an article, if known.
    #[must_use]
    pub fn article_name(&self, article_id: ArticleId) -> Option<&str> {
        self.names.get(&article_id).map(String::as_str)
    }
}

impl InventoryLookup for InventorySnapshot {
    fn current_stock(&self, article_id: ArticleId) -> Option<Quantity> {
        self.stock.get(&article_id).copied()
    }

    fn in_progress_production(&self, article_id: ArticleId) -> Option<Quantity> {
        // A known article with no running fabrication has zero in production.
        self.in_production
            .get(&article_id)
            .copied()
            .or_else(|| self.stock.contains_key(&article_id).then_some(Quantity::ZERO))
    }
}

/// Everything one production-summary computation reads.
#[derive(Debug, Clone, Default)]
pub struct ProductionSnapshot {
    /// Active orders (caller-defined status exclusion already applied or not;
    /// the aggregator applies it again).
    pub orders: Vec<Order>,
    /// Stock and in-progress production.
    pub inventory: InventorySnapshot,
}
