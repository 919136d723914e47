//! Production planning route handlers.
//!
//! Every request loads a fresh snapshot and recomputes the plan. Nothing is
//! cached between requests, so a reorder is visible on the next summary.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::instrument;

use fournil_core::{ClientId, OrderId};

use crate::db::OrderRepository;
use crate::error::AppError;
use crate::services::production::{
    DateFilter, GroupBy, OrderDetail, SummaryFilter, SummaryView, load_plan,
};
use crate::state::AppState;

/// Query parameters of the production summary.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    pub client_id: Option<i32>,
    /// `today`, `yesterday` or `YYYY-MM-DD`.
    pub date: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub group_by: GroupBy,
}

impl SummaryQuery {
    /// Validate the raw parameters into a filter.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Production` with `InvalidFilter` on a bad date.
    pub fn filter(&self) -> Result<SummaryFilter, AppError> {
        Ok(SummaryFilter {
            client_id: self.client_id.map(ClientId::new),
            date: DateFilter::parse(self.date.as_deref(), self.start_date, self.end_date)?,
        })
    }
}

/// Body of a priority update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    /// Active orders in their new fulfillment sequence.
    pub order_ids: Vec<OrderId>,
}

/// Compute the production summary for every active order.
///
/// Filters only hide orders from the response; hidden orders still take
/// their stock first if they come earlier in the sequence.
#[instrument(skip(state))]
pub async fn production_summary(
    State(state): State<AppState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<SummaryView>, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let filter = query.filter()?;

    let plan = load_plan(state.pool(), &state.config().excluded_order_statuses).await?;
    let today = Local::now().date_naive();

    Ok(Json(plan.view(&filter, query.group_by, today, &Local)))
}

/// Line-level production detail of one order.
#[instrument(skip(state))]
pub async fn production_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<OrderDetail>, AppError> {
    let plan = load_plan(state.pool(), &state.config().excluded_order_statuses).await?;
    Ok(Json(plan.order_detail(OrderId::new(id))?))
}

/// Persist a new fulfillment sequence.
#[instrument(skip(state, body))]
pub async fn reorder(
    State(state): State<AppState>,
    body: Result<Json<ReorderRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(body) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    if body.order_ids.is_empty() {
        return Err(AppError::BadRequest("orderIds must not be empty".to_string()));
    }

    OrderRepository::new(state.pool())
        .reorder(&body.order_ids)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
