pub mod error;
pub mod repositories;
pub mod reservation;
pub mod table;

// Re-export commonly used types
pub use error::{DomainError, DomainResult};
pub use repositories::RepositoryProvider;
pub use reservation::{CustomerContact, CustomerKey, Reservation, ReservationStatus};
pub use table::{Table, TableStatus};
