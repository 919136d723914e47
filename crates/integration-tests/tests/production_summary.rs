//! Scenario tests for the production summary engine.
//!
//! Snapshots are built in memory, so these run without a database.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use fournil_admin::services::production::{
    DateFilter, GroupBy, OrderSummary, ProductionPlan, SummaryFilter, SummaryView,
};
use fournil_core::{
    ArticleId, ClientId, LineAvailability, OperationStatus, OperationType, OrderId, OrderStatus,
    PreparationStatus, Quantity,
};
use fournil_integration_tests::{OrderBuilder, SnapshotBuilder, units};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
}

fn at(day: NaiveDate, hour: u32) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_hms_opt(hour, 0, 0).unwrap())
}

fn yesterday() -> NaiveDate {
    today().checked_sub_days(Days::new(1)).unwrap()
}

fn qty(s: &str) -> Quantity {
    Quantity::try_new(s.parse::<Decimal>().unwrap()).unwrap()
}

fn all_orders(plan: &ProductionPlan) -> Vec<OrderSummary> {
    plan.summarize(&SummaryFilter::default(), today(), &Utc)
}

// =============================================================================
// Allocation properties
// =============================================================================

#[test]
fn test_priority_respect() {
    let plan = ProductionPlan::compute(
        SnapshotBuilder::new()
            .article(1, units(15))
            .order(OrderBuilder::new(20, at(today(), 8)).priority(2).line(1, units(10)))
            .order(OrderBuilder::new(10, at(today(), 9)).priority(1).line(1, units(10)))
            .build(),
        &[],
    );

    let orders = all_orders(&plan);
    assert_eq!(orders[0].order_id, OrderId::new(10));
    assert_eq!(orders[0].lines[0].to_pick, units(10));
    assert_eq!(orders[0].lines[0].to_produce, units(0));
    assert_eq!(orders[1].order_id, OrderId::new(20));
    assert_eq!(orders[1].lines[0].to_pick, units(5));
    assert_eq!(orders[1].lines[0].to_produce, units(5));
}

#[test]
fn test_missing_priority_sorts_first_and_ties_break_on_id() {
    let plan = ProductionPlan::compute(
        SnapshotBuilder::new()
            .article(1, units(4))
            .order(OrderBuilder::new(3, at(today(), 8)).priority(1).line(1, units(4)))
            .order(OrderBuilder::new(2, at(today(), 8)).line(1, units(2)))
            .order(OrderBuilder::new(1, at(today(), 8)).line(1, units(1)))
            .build(),
        &[],
    );

    let picked: Vec<(OrderId, Quantity)> = all_orders(&plan)
        .iter()
        .map(|o| (o.order_id, o.lines[0].to_pick))
        .collect();
    assert_eq!(
        picked,
        vec![
            (OrderId::new(1), units(1)),
            (OrderId::new(2), units(2)),
            (OrderId::new(3), units(1)),
        ]
    );
}

#[test]
fn test_conservation_and_non_oversubscription() {
    let mut snapshot = SnapshotBuilder::new()
        .article(1, qty("7.250"))
        .article(2, units(3))
        .untracked_article(3, units(50))
        .fabrication(1, qty("1.5"))
        .fabrication(2, units(10));
    for id in 1..=6 {
        snapshot = snapshot.order(
            OrderBuilder::new(id, at(today(), 8))
                .priority(7 - id)
                .line(1, qty("1.125"))
                .line(2, units(1))
                .line(3, units(2)),
        );
    }
    let plan = ProductionPlan::compute(snapshot.build(), &[]);

    for row in plan.rows() {
        assert_eq!(
            row.to_pick + row.covered_by_production + row.to_produce,
            row.ordered,
            "row {row:?}"
        );
    }

    let mut picked: HashMap<ArticleId, Quantity> = HashMap::new();
    for row in plan.rows() {
        *picked.entry(row.article_id).or_default() += row.to_pick;
    }
    assert!(picked[&ArticleId::new(1)] <= qty("7.250"));
    assert!(picked[&ArticleId::new(2)] <= units(3));
    // Untracked stock is never allocated.
    assert_eq!(picked[&ArticleId::new(3)], units(0));
}

#[test]
fn test_in_progress_production_reduces_shortfall() {
    let plan = ProductionPlan::compute(
        SnapshotBuilder::new()
            .article(1, units(0))
            .fabrication(1, units(6))
            .order(OrderBuilder::new(1, at(today(), 8)).line(1, units(10)))
            .build(),
        &[],
    );

    let orders = all_orders(&plan);
    assert_eq!(orders[0].lines[0].to_pick, units(0));
    assert_eq!(orders[0].lines[0].to_produce, units(4));
    assert_eq!(orders[0].status, PreparationStatus::InProduction);
}

#[test]
fn test_excess_production_floors_at_zero() {
    let plan = ProductionPlan::compute(
        SnapshotBuilder::new()
            .article(1, units(0))
            .fabrication(1, units(15))
            .order(OrderBuilder::new(1, at(today(), 8)).line(1, units(10)))
            .build(),
        &[],
    );

    let orders = all_orders(&plan);
    assert_eq!(orders[0].lines[0].to_produce, units(0));
}

#[test]
fn test_only_running_fabrication_counts() {
    let plan = ProductionPlan::compute(
        SnapshotBuilder::new()
            .article(1, units(0))
            .operation(
                OperationType::Fabrication,
                OperationStatus::Completed,
                1,
                units(5),
            )
            .operation(OperationType::Reception, OperationStatus::EnCours, 1, units(5))
            .operation(OperationType::Fabrication, OperationStatus::Draft, 1, units(5))
            .order(OrderBuilder::new(1, at(today(), 8)).line(1, units(10)))
            .build(),
        &[],
    );

    assert_eq!(all_orders(&plan)[0].lines[0].to_produce, units(10));
}

#[test]
fn test_idempotence() {
    let build = || {
        SnapshotBuilder::new()
            .article(1, units(9))
            .article(2, units(1))
            .fabrication(2, units(2))
            .order(OrderBuilder::new(1, at(yesterday(), 8)).line(1, units(5)).line(2, units(4)))
            .order(OrderBuilder::new(2, at(today(), 8)).priority(1).line(1, units(5)))
            .build()
    };

    let first = ProductionPlan::compute(build(), &[]);
    let second = ProductionPlan::compute(build(), &[]);
    assert_eq!(first.rows(), second.rows());
    assert_eq!(all_orders(&first), all_orders(&second));
}

#[test]
fn test_unknown_article_robustness() {
    let plan = ProductionPlan::compute(
        SnapshotBuilder::new()
            .article(1, units(10))
            .order(
                OrderBuilder::new(1, at(today(), 8))
                    .line(999, units(3))
                    .line(1, units(2)),
            )
            .build(),
        &[],
    );

    let detail = plan.order_detail(OrderId::new(1)).unwrap();
    assert_eq!(detail.lines[0].quantity_adjusted, units(0));
    assert_eq!(detail.lines[0].in_production, units(3));
    assert_eq!(detail.lines[0].article_name, None);
    assert_eq!(detail.lines[0].status, LineAvailability::Missing);
    assert_eq!(detail.lines[1].quantity_adjusted, units(2));
    assert_eq!(detail.status, PreparationStatus::PartiallyPrepared);
}

#[test]
fn test_excluded_statuses_release_stock() {
    let plan = ProductionPlan::compute(
        SnapshotBuilder::new()
            .article(1, units(10))
            .order(
                OrderBuilder::new(1, at(today(), 8))
                    .priority(1)
                    .status(OrderStatus::Cancelled)
                    .line(1, units(10)),
            )
            .order(
                OrderBuilder::new(2, at(today(), 8))
                    .priority(2)
                    .status(OrderStatus::Delivered)
                    .line(1, units(10)),
            )
            .order(OrderBuilder::new(3, at(today(), 8)).priority(3).line(1, units(10)))
            .build(),
        &[OrderStatus::Cancelled, OrderStatus::Delivered],
    );

    let orders = all_orders(&plan);
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, PreparationStatus::Prepared);
}

// =============================================================================
// Filters
// =============================================================================

fn two_day_plan() -> ProductionPlan {
    ProductionPlan::compute(
        SnapshotBuilder::new()
            .article(1, units(100))
            .order(
                OrderBuilder::new(1, at(yesterday(), 15))
                    .client(5)
                    .line(1, units(5)),
            )
            .order(
                OrderBuilder::new(2, at(today(), 7))
                    .client(6)
                    .line(1, units(12))
                    .line(1, units(3)),
            )
            .build(),
        &[],
    )
}

#[test]
fn test_date_filter_independence() {
    let plan = two_day_plan();
    let unfiltered = all_orders(&plan);

    let yesterday_only = plan.summarize(
        &SummaryFilter {
            client_id: None,
            date: Some(DateFilter::Yesterday),
        },
        today(),
        &Utc,
    );
    assert_eq!(yesterday_only.len(), 1);
    assert_eq!(yesterday_only[0].lines.len(), 1);
    assert_eq!(yesterday_only[0].lines[0].ordered, units(5));
    assert_eq!(yesterday_only[0], unfiltered[0]);

    let today_only = plan.summarize(
        &SummaryFilter {
            client_id: None,
            date: Some(DateFilter::Today),
        },
        today(),
        &Utc,
    );
    assert_eq!(today_only.len(), 1);
    let ordered: Vec<Quantity> = today_only[0].lines.iter().map(|l| l.ordered).collect();
    assert_eq!(ordered, vec![units(12), units(3)]);
    assert_eq!(today_only[0], unfiltered[1]);
}

#[test]
fn test_explicit_day_and_range_filters() {
    let plan = two_day_plan();

    let day = yesterday().to_string();
    let on_yesterday = DateFilter::parse(Some(&day), None, None)
        .unwrap()
        .unwrap();
    let orders = plan.summarize(
        &SummaryFilter {
            client_id: None,
            date: Some(on_yesterday),
        },
        today(),
        &Utc,
    );
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].order_id, OrderId::new(1));

    let range = DateFilter::parse(None, Some(yesterday()), Some(today()))
        .unwrap()
        .unwrap();
    let orders = plan.summarize(
        &SummaryFilter {
            client_id: None,
            date: Some(range),
        },
        today(),
        &Utc,
    );
    assert_eq!(orders.len(), 2);
}

#[test]
fn test_client_filter_keeps_upstream_consumption() {
    let plan = ProductionPlan::compute(
        SnapshotBuilder::new()
            .article(1, units(8))
            .order(OrderBuilder::new(1, at(today(), 8)).client(1).line(1, units(6)))
            .order(OrderBuilder::new(2, at(today(), 9)).client(2).line(1, units(6)))
            .build(),
        &[],
    );

    let orders = plan.summarize(
        &SummaryFilter {
            client_id: Some(ClientId::new(2)),
            date: None,
        },
        today(),
        &Utc,
    );
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].lines[0].to_pick, units(2));
    assert_eq!(orders[0].lines[0].to_produce, units(4));
}

#[test]
fn test_by_article_view_json_shape() {
    let plan = two_day_plan();
    let view = plan.view(&SummaryFilter::default(), GroupBy::Article, today(), &Utc);

    let SummaryView::Article { articles } = &view else {
        panic!("expected per-article view");
    };
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].ordered, units(20));

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["groupBy"], "article");
    assert_eq!(json["articles"][0]["articleId"], 1);
    assert_eq!(json["articles"][0]["toPick"], "20.000");
    assert_eq!(json["articles"][0]["coveredByProduction"], "0.000");
}

fn stock_and_fabrication_plan() -> ProductionPlan {
    ProductionPlan::compute(
        SnapshotBuilder::new()
            .article(1, units(10))
            .article(2, units(0))
            .fabrication(2, units(5))
            .order(
                OrderBuilder::new(1, at(today(), 8))
                    .line(1, units(10))
                    .line(2, units(5)),
            )
            .build(),
        &[],
    )
}

#[test]
fn test_stock_and_fabrication_coverage_is_partially_prepared() {
    let plan = stock_and_fabrication_plan();

    let detail = plan.order_detail(OrderId::new(1)).unwrap();
    let statuses: Vec<LineAvailability> = detail.lines.iter().map(|l| l.status).collect();
    assert_eq!(
        statuses,
        vec![LineAvailability::Available, LineAvailability::InProduction]
    );
    assert_eq!(detail.status, PreparationStatus::PartiallyPrepared);
    assert_eq!(all_orders(&plan)[0].status, PreparationStatus::PartiallyPrepared);
}

#[test]
fn test_summary_views_report_covered_quantity() {
    let plan = stock_and_fabrication_plan();

    let orders = all_orders(&plan);
    for line in &orders[0].lines {
        assert_eq!(
            line.to_pick + line.covered_by_production + line.to_produce,
            line.ordered
        );
    }
    assert_eq!(orders[0].lines[1].covered_by_production, units(5));

    let view = plan.view(&SummaryFilter::default(), GroupBy::Article, today(), &Utc);
    let json = serde_json::to_value(&view).unwrap();
    let covered = &json["articles"][1];
    assert_eq!(covered["articleId"], 2);
    assert_eq!(covered["ordered"], "5.000");
    assert_eq!(covered["toPick"], "0.000");
    assert_eq!(covered["coveredByProduction"], "5.000");
    assert_eq!(covered["toProduce"], "0.000");

    let by_order = plan.view(&SummaryFilter::default(), GroupBy::Order, today(), &Utc);
    let json = serde_json::to_value(&by_order).unwrap();
    assert_eq!(json["orders"][0]["lines"][1]["coveredByProduction"], "5.000");
}
