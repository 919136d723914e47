//! Business logic services for the back-office.
//!
//! # Services
//!
//! - `production` - Production summary: stock allocation across competing
//!   orders, preparation status, filters and planning views

pub mod production;

pub use production::{ProductionError, ProductionPlan, load_plan};
