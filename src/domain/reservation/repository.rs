//! Reservation repository interface

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::{CustomerKey, Reservation};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Save a new reservation
    async fn save(&self, reservation: Reservation) -> DomainResult<()>;

    /// Find reservation by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>>;

    /// Find reservation by its customer-facing confirmation code.
    /// Lookup is case-normalized by the caller.
    async fn find_by_confirmation_code(&self, code: &str) -> DomainResult<Option<Reservation>>;

    /// All reservations targeting the given date (any status)
    async fn find_by_date(&self, date: NaiveDate) -> DomainResult<Vec<Reservation>>;

    /// All reservations belonging to a customer (any status)
    async fn find_by_customer(&self, key: &CustomerKey) -> DomainResult<Vec<Reservation>>;

    /// All non-terminal reservations
    async fn find_active(&self) -> DomainResult<Vec<Reservation>>;

    /// Update an existing reservation
    async fn update(&self, reservation: Reservation) -> DomainResult<()>;
}
