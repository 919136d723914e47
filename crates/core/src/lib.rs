//! Fournil Core - Shared types library.
//!
//! This crate provides common types used across all Fournil components:
//! - `admin` - Back-office service (order preparation, production planning)
//! - `cli` - Command-line tools for migrations and production summaries
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, quantities and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
