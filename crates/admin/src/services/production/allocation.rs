//! Allocation of finite stock to competing order lines.
//!
//! # Algorithm
//!
//! 1. Seed a per-call `remaining` counter for every referenced article from
//!    the snapshot's on-hand stock.
//! 2. Walk demand lines in precedence order and pick
//!    `min(quantity, remaining)`; the rest of the line is its shortfall.
//! 3. Sum shortfalls per article. What running fabrication cannot absorb is
//!    the producible remainder: `max(0, total_shortfall - in_production)`.
//! 4. Walk the shortfall-bearing lines again in the same order and let running
//!    fabrication cover them greedily. Earlier lines are covered first, so the
//!    producible remainder lands on the latest lines.
//!
//! For every row `to_pick + to_produce + covered_by_production == ordered`, and
//! for every article the picked total never exceeds on-hand stock.

use std::collections::HashMap;

use fournil_core::{ArticleId, LineAvailability, OrderId, OrderLineId, Quantity};
use serde::Serialize;

use super::aggregator::DemandLine;
use super::classifier::line_availability;
use super::snapshot::InventoryLookup;

/// Outcome of allocation for one demand line. Computed per request, never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRow {
    /// Order the line belongs to.
    pub order_id: OrderId,
    /// Source order line.
    pub line_id: OrderLineId,
    /// Article demanded.
    pub article_id: ArticleId,
    /// Quantity ordered.
    pub ordered: Quantity,
    /// Stock left for this line after every earlier line took its share.
    pub stock_available: Quantity,
    /// Quantity fulfilled from existing stock.
    pub to_pick: Quantity,
    /// Part of the shortfall already covered by running fabrication.
    pub covered_by_production: Quantity,
    /// Quantity that still has to be scheduled for production.
    pub to_produce: Quantity,
    /// Whether the article exists in the snapshot.
    pub article_known: bool,
}

impl AllocationRow {
    /// Quantity not fulfillable from stock.
    #[must_use]
    pub fn shortfall(&self) -> Quantity {
        self.ordered.saturating_sub(self.to_pick)
    }

    /// Stock left for later lines once this line has picked.
    #[must_use]
    pub fn stock_remaining(&self) -> Quantity {
        self.stock_available.saturating_sub(self.to_pick)
    }

    /// Line-level availability tag.
    #[must_use]
    pub fn availability(&self) -> LineAvailability {
        line_availability(self)
    }
}

/// Per-article counters for one allocation call.
#[derive(Debug, Default)]
struct ArticleLedger {
    remaining_stock: Quantity,
    in_production: Quantity,
    total_shortfall: Quantity,
    known: bool,
}

/// Allocate stock and running fabrication to `demand`, which must already be
/// in precedence order.
///
/// Returns one row per demand line, in the same order. Unknown articles get
/// zero stock and zero production; the computation never aborts on them.
#[must_use]
pub fn allocate<I: InventoryLookup + ?Sized>(demand: &[DemandLine], inventory: &I) -> Vec<AllocationRow> {
    let mut ledgers: HashMap<ArticleId, ArticleLedger> = HashMap::new();
    for line in demand {
        ledgers
            .entry(line.article_id)
            .or_insert_with(|| seed_ledger(line.article_id, inventory));
    }

    // Pass 1: pick from stock in precedence order.
    let mut rows: Vec<AllocationRow> = Vec::with_capacity(demand.len());
    for line in demand {
        let ledger = ledgers.entry(line.article_id).or_default();
        let stock_available = ledger.remaining_stock;
        let to_pick = line.quantity.min(stock_available);
        ledger.remaining_stock = stock_available.saturating_sub(to_pick);

        let shortfall = line.quantity.saturating_sub(to_pick);
        ledger.total_shortfall += shortfall;

        if stock_available.is_positive() && ledger.remaining_stock.is_zero() {
            tracing::debug!(
                article_id = %line.article_id,
                order_id = %line.order_id,
                "stock exhausted"
            );
        }

        rows.push(AllocationRow {
            order_id: line.order_id,
            line_id: line.line_id,
            article_id: line.article_id,
            ordered: line.quantity,
            stock_available,
            to_pick,
            covered_by_production: Quantity::ZERO,
            to_produce: shortfall,
            article_known: ledger.known,
        });
    }

    // Pass 2: running fabrication covers shortfalls in the same order.
    let mut production_left: HashMap<ArticleId, Quantity> = ledgers
        .iter()
        .map(|(article_id, ledger)| {
            let covered = ledger.in_production.min(ledger.total_shortfall);
            (*article_id, covered)
        })
        .collect();

    for row in &mut rows {
        let shortfall = row.to_produce;
        if shortfall.is_zero() {
            continue;
        }
        let left = production_left.entry(row.article_id).or_default();
        let covered = shortfall.min(*left);
        *left = left.saturating_sub(covered);
        row.covered_by_production = covered;
        row.to_produce = shortfall.saturating_sub(covered);
    }

    debug_assert!(
        ledgers.iter().all(|(article_id, ledger)| {
            let produced: Quantity = rows
                .iter()
                .filter(|r| r.article_id == *article_id)
                .map(|r| r.to_produce)
                .sum();
            produced == ledger.total_shortfall.saturating_sub(ledger.in_production)
        }),
        "producible remainder must equal the sum of to_produce"
    );

    rows
}

fn seed_ledger<I: InventoryLookup + ?Sized>(article_id: ArticleId, inventory: &I) -> ArticleLedger {
    match inventory.current_stock(article_id) {
        Some(stock) => ArticleLedger {
            remaining_stock: stock,
            in_production: inventory
                .in_progress_production(article_id)
                .unwrap_or(Quantity::ZERO),
            total_shortfall: Quantity::ZERO,
            known: true,
        },
        None => {
            tracing::warn!(%article_id, "demand references unknown article, treating stock as zero");
            ArticleLedger::default()
        }
    }
}
