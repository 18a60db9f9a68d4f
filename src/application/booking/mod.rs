//! Reservation booking engine
//!
//! - `clock`: site-local time, booking window, interval arithmetic
//! - `conflict`: the single source of truth for interval conflicts
//! - `limits`: per-customer booking caps, checked before allocation
//! - `allocator`: explicit and closest-fit automatic table selection
//! - `expiry`: lazy expiration of elapsed reservations
//! - `lifecycle`: the reservation state machine and its side effects
//! - `availability`: time-slot and calendar presentation queries

pub mod allocator;
pub mod availability;
pub mod clock;
pub mod codes;
pub mod conflict;
pub mod expiry;
pub mod hooks;
pub mod lifecycle;
pub mod limits;

#[cfg(test)]
pub(crate) mod testutil;

pub use allocator::{AllocationRequest, TableAllocator};
pub use availability::{AvailabilityService, DayAvailability, TableSlots, TimeSlot};
pub use expiry::{start_expiry_task, ExpirySweeper};
pub use hooks::{CustomerStatsUpdater, LoggingCustomerStats, NotificationScheduler, ReminderLead};
pub use lifecycle::{CreateReservation, ReservationService, UpdateReservation};
pub use limits::BookingLimitGuard;
