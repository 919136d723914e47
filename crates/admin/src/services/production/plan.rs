//! One computed production plan: allocation rows plus the views built on them.

use std::ops::Range;

use chrono::{NaiveDate, TimeZone};

use fournil_core::{OrderId, OrderStatus, Quantity};

use super::ProductionError;
use super::aggregator::{active_orders_by_precedence, demand_lines};
use super::allocation::{AllocationRow, allocate};
use super::classifier::classify_order;
use super::report::{
    ArticleSummary, GroupBy, LineDetail, LineSummary, OrderDetail, OrderSummary, SummaryFilter,
    SummaryView, aggregate_by_article,
};
use super::snapshot::{InventorySnapshot, ProductionSnapshot};
use crate::models::Order;

/// Allocation of one snapshot, held in request-scoped memory.
#[derive(Debug, Clone)]
pub struct ProductionPlan {
    /// Active orders in precedence order.
    orders: Vec<Order>,
    /// Row span of each entry of `orders` inside `rows`.
    spans: Vec<Range<usize>>,
    rows: Vec<AllocationRow>,
    inventory: InventorySnapshot,
}

impl ProductionPlan {
    /// Run the allocation over the full active-order set of a snapshot.
    #[must_use]
    pub fn compute(snapshot: ProductionSnapshot, excluded: &[OrderStatus]) -> Self {
        let active = active_orders_by_precedence(&snapshot.orders, excluded);
        let demand = demand_lines(&active);
        let rows = allocate(&demand.lines, &snapshot.inventory);
        let spans = demand.spans;
        let orders: Vec<Order> = active.into_iter().cloned().collect();

        let to_produce: Quantity = rows.iter().map(|r| r.to_produce).sum();
        tracing::info!(
            orders = orders.len(),
            lines = rows.len(),
            %to_produce,
            "production plan computed"
        );

        Self {
            orders,
            spans,
            rows,
            inventory: snapshot.inventory,
        }
    }

    /// Every allocation row, in precedence order.
    #[must_use]
    pub fn rows(&self) -> &[AllocationRow] {
        &self.rows
    }

    fn order_rows(&self, index: usize) -> &[AllocationRow] {
        self.spans
            .get(index)
            .and_then(|span| self.rows.get(span.clone()))
            .unwrap_or_default()
    }

    fn summary_at(&self, index: usize, order: &Order) -> OrderSummary {
        let rows = self.order_rows(index);
        OrderSummary {
            order_id: order.id,
            client_id: order.client_id,
            order_date: order.order_date,
            priority: order.priority,
            status: classify_order(rows),
            lines: rows.iter().map(LineSummary::from).collect(),
        }
    }

    /// Per-order summaries that pass `filter`, in precedence order.
    ///
    /// `today` must be the current calendar day in `tz`.
    pub fn summarize<Tz: TimeZone>(
        &self,
        filter: &SummaryFilter,
        today: NaiveDate,
        tz: &Tz,
    ) -> Vec<OrderSummary> {
        self.orders
            .iter()
            .enumerate()
            .map(|(index, order)| self.summary_at(index, order))
            .filter(|summary| filter.matches(summary, today, tz))
            .collect()
    }

    /// Per-article totals over the orders that pass `filter`.
    pub fn summarize_by_article<Tz: TimeZone>(
        &self,
        filter: &SummaryFilter,
        today: NaiveDate,
        tz: &Tz,
    ) -> Vec<ArticleSummary> {
        aggregate_by_article(&self.summarize(filter, today, tz))
    }

    /// Filtered summary in the requested grouping.
    pub fn view<Tz: TimeZone>(
        &self,
        filter: &SummaryFilter,
        group_by: GroupBy,
        today: NaiveDate,
        tz: &Tz,
    ) -> SummaryView {
        match group_by {
            GroupBy::Order => SummaryView::Order {
                orders: self.summarize(filter, today, tz),
            },
            GroupBy::Article => SummaryView::Article {
                articles: self.summarize_by_article(filter, today, tz),
            },
        }
    }

    /// Line-level production detail of one active order.
    ///
    /// # Errors
    ///
    /// Returns `ProductionError::UnknownOrder` if the order is not part of the
    /// active set.
    pub fn order_detail(&self, order_id: OrderId) -> Result<OrderDetail, ProductionError> {
        let (index, order) = self
            .orders
            .iter()
            .enumerate()
            .find(|(_, order)| order.id == order_id)
            .ok_or(ProductionError::UnknownOrder(order_id))?;
        let rows = self.order_rows(index);

        let lines = rows
            .iter()
            .map(|row| {
                let name = self.inventory.article_name(row.article_id);
                if name.is_none() {
                    tracing::warn!(
                        %order_id,
                        article_id = %row.article_id,
                        "order line references an unknown article"
                    );
                }
                LineDetail::from_row(row, name)
            })
            .collect();

        Ok(OrderDetail {
            order_id: order.id,
            client_id: order.client_id,
            order_date: order.order_date,
            delivery_date: order.delivery_date,
            priority: order.priority,
            status: classify_order(rows),
            lines,
        })
    }
}
