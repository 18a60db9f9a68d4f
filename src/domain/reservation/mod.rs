//! Reservation aggregate: entity and repository trait

pub mod model;
pub mod repository;

pub use model::{CustomerContact, CustomerKey, Reservation, ReservationStatus};
pub use repository::ReservationRepository;
