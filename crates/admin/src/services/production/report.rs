//! Caller filters and output shapes for the production summary.
//!
//! Filtering happens strictly after allocation: an order hidden by a filter
//! still consumed its stock upstream, so visible orders see the same numbers
//! whatever the filter.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use fournil_core::{
    ArticleId, ClientId, LineAvailability, OrderId, OrderLineId, PreparationStatus, Quantity,
};

use super::ProductionError;
use super::allocation::AllocationRow;

/// Calendar-day filter on the order date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    /// Orders taken today.
    Today,
    /// Orders taken yesterday.
    Yesterday,
    /// Orders taken on a given day.
    On(NaiveDate),
    /// Orders taken within an inclusive range; either bound may be open.
    Between {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl DateFilter {
    /// Build a date filter from the raw query parameters.
    ///
    /// `date` accepts `today`, `yesterday` or `YYYY-MM-DD` and takes
    /// precedence over `start`/`end`.
    ///
    /// # Errors
    ///
    /// Returns `ProductionError::InvalidFilter` on an unparsable `date` or an
    /// inverted range.
    pub fn parse(
        date: Option<&str>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Option<Self>, ProductionError> {
        if let Some(date) = date.map(str::trim).filter(|d| !d.is_empty()) {
            return match date {
                "today" => Ok(Some(Self::Today)),
                "yesterday" => Ok(Some(Self::Yesterday)),
                other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
                    .map(|day| Some(Self::On(day)))
                    .map_err(|_| {
                        ProductionError::InvalidFilter(format!(
                            "date must be today, yesterday or YYYY-MM-DD (got {other:?})"
                        ))
                    }),
            };
        }

        match (start, end) {
            (None, None) => Ok(None),
            (Some(s), Some(e)) if s > e => Err(ProductionError::InvalidFilter(format!(
                "startDate {s} is after endDate {e}"
            ))),
            _ => Ok(Some(Self::Between { start, end })),
        }
    }

    /// Whether a local calendar day passes this filter.
    #[must_use]
    pub fn contains(&self, day: NaiveDate, today: NaiveDate) -> bool {
        match *self {
            Self::Today => day == today,
            Self::Yesterday => today.checked_sub_days(Days::new(1)) == Some(day),
            Self::On(on) => day == on,
            Self::Between { start, end } => {
                start.is_none_or(|s| day >= s) && end.is_none_or(|e| day <= e)
            }
        }
    }
}

/// Caller filters applied to the computed summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryFilter {
    /// Exact client match.
    pub client_id: Option<ClientId>,
    /// Order-date filter.
    pub date: Option<DateFilter>,
}

impl SummaryFilter {
    /// Whether an order passes the filter.
    ///
    /// The order date is converted to `tz` before taking its calendar day;
    /// `today` is the current day in that same zone.
    pub fn matches<Tz: TimeZone>(
        &self,
        summary: &OrderSummary,
        today: NaiveDate,
        tz: &Tz,
    ) -> bool {
        if self.client_id.is_some_and(|c| c != summary.client_id) {
            return false;
        }
        self.date.is_none_or(|filter| {
            let day = summary.order_date.with_timezone(tz).date_naive();
            filter.contains(day, today)
        })
    }
}

/// Allocation outcome of one order line, as returned by the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSummary {
    pub article_id: ArticleId,
    pub ordered: Quantity,
    pub to_pick: Quantity,
    /// Shortfall already covered by running fabrication.
    pub covered_by_production: Quantity,
    pub to_produce: Quantity,
}

impl From<&AllocationRow> for LineSummary {
    fn from(row: &AllocationRow) -> Self {
        Self {
            article_id: row.article_id,
            ordered: row.ordered,
            to_pick: row.to_pick,
            covered_by_production: row.covered_by_production,
            to_produce: row.to_produce,
        }
    }
}

/// One order with its allocated lines and preparation status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_id: OrderId,
    pub client_id: ClientId,
    pub order_date: DateTime<Utc>,
    pub priority: Option<i32>,
    pub status: PreparationStatus,
    pub lines: Vec<LineSummary>,
}

/// Totals for one article across every matching order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub article_id: ArticleId,
    pub ordered: Quantity,
    pub to_pick: Quantity,
    pub covered_by_production: Quantity,
    pub to_produce: Quantity,
}

/// Sum ordered, picked, covered and to-produce quantities per article.
///
/// Articles come out sorted by ID.
#[must_use]
pub fn aggregate_by_article(orders: &[OrderSummary]) -> Vec<ArticleSummary> {
    let mut totals: BTreeMap<ArticleId, ArticleSummary> = BTreeMap::new();

    for line in orders.iter().flat_map(|o| &o.lines) {
        let entry = totals.entry(line.article_id).or_insert(ArticleSummary {
            article_id: line.article_id,
            ordered: Quantity::ZERO,
            to_pick: Quantity::ZERO,
            covered_by_production: Quantity::ZERO,
            to_produce: Quantity::ZERO,
        });
        entry.ordered += line.ordered;
        entry.to_pick += line.to_pick;
        entry.covered_by_production += line.covered_by_production;
        entry.to_produce += line.to_produce;
    }

    totals.into_values().collect()
}

/// Shape of the summary response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// One entry per order with its lines.
    #[default]
    Order,
    /// One entry per article with totals.
    Article,
}

/// Production summary in the requested grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "groupBy", rename_all = "lowercase")]
pub enum SummaryView {
    Order { orders: Vec<OrderSummary> },
    Article { articles: Vec<ArticleSummary> },
}

/// Per-line view for the order production detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDetail {
    pub line_id: OrderLineId,
    pub article_id: ArticleId,
    /// `None` when the article no longer exists.
    pub article_name: Option<String>,
    pub ordered: Quantity,
    pub stock_available: Quantity,
    pub quantity_adjusted: Quantity,
    pub stock_remaining: Quantity,
    pub in_production: Quantity,
    pub covered_by_production: Quantity,
    pub status: LineAvailability,
}

impl LineDetail {
    /// Build the detail view of a row.
    #[must_use]
    pub fn from_row(row: &AllocationRow, article_name: Option<&str>) -> Self {
        Self {
            line_id: row.line_id,
            article_id: row.article_id,
            article_name: article_name.map(String::from),
            ordered: row.ordered,
            stock_available: row.stock_available,
            quantity_adjusted: row.to_pick,
            stock_remaining: row.stock_remaining(),
            in_production: row.to_produce,
            covered_by_production: row.covered_by_production,
            status: row.availability(),
        }
    }
}

/// Production detail of a single order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub order_id: OrderId,
    pub client_id: ClientId,
    pub order_date: DateTime<Utc>,
    pub delivery_date: Option<NaiveDate>,
    pub priority: Option<i32>,
    pub status: PreparationStatus,
    pub lines: Vec<LineDetail>,
}
