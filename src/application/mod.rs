//! Application layer: business services over the domain repositories

pub mod booking;

pub use booking::{
    AvailabilityService, CreateReservation, ReservationService, UpdateReservation,
};
