//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (per-request span)
//! 3. Request ID (`x-request-id`, recorded on the span)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
