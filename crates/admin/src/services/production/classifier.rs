//! Maps allocation rows to preparation states.
//!
//! Both classifications are a precedence table evaluated top to bottom: the
//! first rule whose predicate holds wins, and the last entry is the default.
//! Every combination of line states therefore maps to exactly one label.

use fournil_core::{LineAvailability, PreparationStatus};

use super::allocation::AllocationRow;

/// Facts about an order's rows that the order-level rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderFacts {
    /// Every line is entirely picked and nothing is left to produce.
    pub fully_picked: bool,
    /// At least one line picks something from stock.
    pub any_picked: bool,
    /// At least one line still needs production.
    pub any_to_produce: bool,
    /// At least one line's shortfall is reduced by running fabrication.
    pub any_covered: bool,
}

impl OrderFacts {
    /// Collect facts from an order's allocation rows.
    pub fn collect<'a>(rows: impl IntoIterator<Item = &'a AllocationRow>) -> Self {
        rows.into_iter().fold(
            Self {
                fully_picked: true,
                ..Self::default()
            },
            |facts, row| Self {
                fully_picked: facts.fully_picked
                    && row.to_produce.is_zero()
                    && row.to_pick == row.ordered,
                any_picked: facts.any_picked || row.to_pick.is_positive(),
                any_to_produce: facts.any_to_produce || row.to_produce.is_positive(),
                any_covered: facts.any_covered || row.covered_by_production.is_positive(),
            },
        )
    }
}

type Rule<F, S> = (S, fn(&F) -> bool);

/// Order-level precedence. `NotPrepared` is the fallback.
const ORDER_RULES: &[Rule<OrderFacts, PreparationStatus>] = &[
    (PreparationStatus::Prepared, |f| f.fully_picked),
    (PreparationStatus::PartiallyPrepared, |f| {
        f.any_picked && (f.any_to_produce || f.any_covered)
    }),
    (PreparationStatus::InProduction, |f| {
        !f.any_picked && f.any_covered
    }),
];

/// Line-level precedence. `Missing` is the fallback.
const LINE_RULES: &[Rule<AllocationRow, LineAvailability>] = &[
    (LineAvailability::Available, |r| r.to_pick == r.ordered),
    (LineAvailability::Partial, |r| r.to_pick.is_positive()),
    (LineAvailability::InProduction, |r| {
        r.covered_by_production.is_positive()
    }),
];

fn first_match<F, S: Copy>(rules: &[Rule<F, S>], facts: &F, fallback: S) -> S {
    rules
        .iter()
        .find(|(_, applies)| applies(facts))
        .map_or(fallback, |(status, _)| *status)
}

/// Classify an order from the full set of its allocation rows.
///
/// An order without lines counts as prepared.
pub fn classify_order<'a>(rows: impl IntoIterator<Item = &'a AllocationRow>) -> PreparationStatus {
    first_match(
        ORDER_RULES,
        &OrderFacts::collect(rows),
        PreparationStatus::NotPrepared,
    )
}

/// Classify a single line.
#[must_use]
pub fn line_availability(row: &AllocationRow) -> LineAvailability {
    first_match(LINE_RULES, row, LineAvailability::Missing)
}
