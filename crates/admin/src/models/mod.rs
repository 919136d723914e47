//! Domain models for the back-office.
//!
//! These mirror the persisted records the production summary reads. They are
//! plain data: the engine never mutates an order, an article or an inventory
//! operation.

pub mod article;
pub mod inventory_operation;
pub mod order;

pub use article::Article;
pub use inventory_operation::{InventoryOperation, OperationItem};
pub use order::{Order, OrderLine};
