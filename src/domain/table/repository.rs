//! Table repository interface

use async_trait::async_trait;

use super::model::{Table, TableStatus};
use crate::domain::DomainResult;

#[async_trait]
pub trait TableRepository: Send + Sync {
    /// Save a newly registered table
    async fn save(&self, table: Table) -> DomainResult<()>;

    /// Find table by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Table>>;

    /// Find table by its human-facing number
    async fn find_by_number(&self, number: u32) -> DomainResult<Option<Table>>;

    /// All registered tables
    async fn find_all(&self) -> DomainResult<Vec<Table>>;

    /// Update an existing table
    async fn update(&self, table: Table) -> DomainResult<()>;

    /// Set the operating status, carrying the reservation back-reference
    /// (`None` when the table is being freed).
    async fn set_status(
        &self,
        id: &str,
        status: TableStatus,
        reservation_id: Option<String>,
    ) -> DomainResult<()>;

    /// Remove a table from the inventory
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
