//! Core types for Fournil.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod quantity;
pub mod status;

pub use id::*;
pub use quantity::{QUANTITY_SCALE, Quantity, QuantityError};
pub use status::*;
