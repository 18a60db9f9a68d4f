//! Repository traits for the domain layer

use super::reservation::ReservationRepository;
use super::table::TableRepository;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let table = repos.tables().find_by_number(12).await?;
///     let todays = repos.reservations().find_by_date(date).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn tables(&self) -> &dyn TableRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
}
