//! Builds the priority-ordered demand sequence from active orders.

use std::ops::Range;

use fournil_core::{ArticleId, OrderId, OrderLineId, OrderStatus, Quantity};

use crate::models::Order;

/// One unit of demand: an order line, in fulfillment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemandLine {
    /// Order the line belongs to.
    pub order_id: OrderId,
    /// Line this demand comes from.
    pub line_id: OrderLineId,
    /// Article demanded.
    pub article_id: ArticleId,
    /// Quantity demanded.
    pub quantity: Quantity,
}

/// Active orders sorted by fulfillment precedence.
///
/// Orders whose status is in `excluded` are dropped. The rest are sorted by
/// priority ascending (missing priority counts as 0), ties broken by order ID.
#[must_use]
pub fn active_orders_by_precedence<'a>(
    orders: &'a [Order],
    excluded: &[OrderStatus],
) -> Vec<&'a Order> {
    let mut active: Vec<&Order> = orders
        .iter()
        .filter(|order| !excluded.contains(&order.status))
        .collect();
    active.sort_by_key(|order| order.precedence_key());
    active
}

/// Demand lines of a set of orders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Demand {
    /// Lines in fulfillment order.
    pub lines: Vec<DemandLine>,
    /// Range of `lines` belonging to each input order, in input order.
    pub spans: Vec<Range<usize>>,
}

/// Flatten priority-ordered orders into demand lines.
///
/// Within an order, lines keep their position order (ties by line ID).
#[must_use]
pub fn demand_lines(orders: &[&Order]) -> Demand {
    let mut lines_out = Vec::with_capacity(orders.iter().map(|o| o.lines.len()).sum());
    let mut spans = Vec::with_capacity(orders.len());

    for order in orders {
        let mut lines: Vec<_> = order.lines.iter().collect();
        lines.sort_by_key(|line| (line.position, line.id));

        let start = lines_out.len();
        lines_out.extend(lines.into_iter().map(|line| DemandLine {
            order_id: order.id,
            line_id: line.id,
            article_id: line.article_id,
            quantity: line.quantity,
        }));
        spans.push(start..lines_out.len());
    }

    Demand {
        lines: lines_out,
        spans,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use fournil_core::ClientId;

    use super::*;
    use crate::models::OrderLine;

    fn order(id: i32, priority: Option<i32>, status: OrderStatus, lines: &[(i32, i32, i32)]) -> Order {
        Order {
            id: OrderId::new(id),
            client_id: ClientId::new(1),
            priority,
            status,
            order_date: Utc.with_ymd_and_hms(2026, 3, 2, 6, 0, 0).single().unwrap_or_default(),
            delivery_date: None,
            lines: lines
                .iter()
                .map(|&(line_id, position, article)| OrderLine {
                    id: OrderLineId::new(line_id),
                    order_id: OrderId::new(id),
                    article_id: ArticleId::new(article),
                    position,
                    quantity: Quantity::from_units(1),
                })
                .collect(),
        }
    }

    fn ids(orders: &[&Order]) -> Vec<i32> {
        orders.iter().map(|o| o.id.as_i32()).collect()
    }

    #[test]
    fn test_sorted_by_priority_then_id() {
        let orders = vec![
            order(5, Some(2), OrderStatus::Confirmed, &[]),
            order(3, Some(2), OrderStatus::Confirmed, &[]),
            order(9, Some(1), OrderStatus::Confirmed, &[]),
        ];
        assert_eq!(ids(&active_orders_by_precedence(&orders, &[])), vec![9, 3, 5]);
    }

    #[test]
    fn test_missing_priority_sorts_first() {
        let orders = vec![
            order(1, Some(1), OrderStatus::Confirmed, &[]),
            order(2, None, OrderStatus::Confirmed, &[]),
            order(3, Some(0), OrderStatus::Confirmed, &[]),
        ];
        assert_eq!(ids(&active_orders_by_precedence(&orders, &[])), vec![2, 3, 1]);
    }

    #[test]
    fn test_excluded_statuses_are_dropped() {
        let orders = vec![
            order(1, Some(1), OrderStatus::Cancelled, &[]),
            order(2, Some(2), OrderStatus::Draft, &[]),
            order(3, Some(3), OrderStatus::Delivered, &[]),
        ];
        let active = active_orders_by_precedence(
            &orders,
            &[OrderStatus::Cancelled, OrderStatus::Delivered],
        );
        assert_eq!(ids(&active), vec![2]);
    }

    #[test]
    fn test_lines_follow_position_within_order() {
        let orders = vec![
            order(1, Some(2), OrderStatus::Confirmed, &[(10, 2, 100), (11, 1, 101)]),
            order(2, Some(1), OrderStatus::Confirmed, &[(20, 0, 102)]),
        ];
        let active = active_orders_by_precedence(&orders, &[]);
        let demand = demand_lines(&active);

        let line_ids: Vec<i32> = demand.lines.iter().map(|d| d.line_id.as_i32()).collect();
        assert_eq!(line_ids, vec![20, 11, 10]);
    }

    #[test]
    fn test_spans_cover_each_order_lines() {
        let orders = vec![
            order(1, Some(3), OrderStatus::Confirmed, &[(10, 0, 100), (11, 1, 101)]),
            order(2, Some(2), OrderStatus::Confirmed, &[]),
            order(3, Some(1), OrderStatus::Confirmed, &[(30, 0, 100)]),
        ];
        let active = active_orders_by_precedence(&orders, &[]);
        let demand = demand_lines(&active);

        assert_eq!(demand.spans, vec![0..1, 1..1, 1..3]);
        for (order, span) in active.iter().zip(&demand.spans) {
            assert!(demand.lines[span.clone()].iter().all(|d| d.order_id == order.id));
        }
    }
}
