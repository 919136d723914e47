pub mod migrate;
pub mod summary;
