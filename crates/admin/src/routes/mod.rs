//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (database ping)
//!
//! # Production planning
//! GET  /orders/production-summary       - Allocation summary (per order or per article)
//! GET  /orders/{id}/production-detail   - Line-level detail of one order
//! PUT  /orders/priority                 - Persist the fulfillment sequence
//! ```

pub mod health;
pub mod production;

use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

/// Build the application router (without middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route(
            "/orders/production-summary",
            get(production::production_summary),
        )
        .route(
            "/orders/{id}/production-detail",
            get(production::production_detail),
        )
        .route("/orders/priority", put(production::reorder))
}
