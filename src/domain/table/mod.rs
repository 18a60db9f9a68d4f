//! Table aggregate: entity and repository trait

pub mod model;
pub mod repository;

pub use model::{Table, TableStatus};
pub use repository::TableRepository;
