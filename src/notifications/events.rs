//! Notification events
//!
//! Typed events broadcast to any observer surface (dashboards, audit
//! sinks) whenever a reservation changes state.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Reservation;

/// Event types for notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// Reservation created and table allocated
    ReservationCreated(ReservationEvent),
    /// Pending reservation confirmed
    ReservationConfirmed(ReservationEvent),
    /// Schedule or details of a reservation changed
    ReservationUpdated(ReservationEvent),
    /// Party arrived and was seated
    GuestSeated(SeatedEvent),
    /// Visit finished
    ReservationCompleted(CompletedEvent),
    /// Reservation cancelled
    ReservationCancelled(CancelledEvent),
    /// Party never arrived
    ReservationNoShow(ReservationEvent),
    /// Elapsed reservation auto-completed by the sweeper
    ReservationExpired(ReservationEvent),
    /// A customer notification was queued for delivery
    NotificationQueued(NotificationEvent),
}

impl Event {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::ReservationCreated(_) => "reservation_created",
            Event::ReservationConfirmed(_) => "reservation_confirmed",
            Event::ReservationUpdated(_) => "reservation_updated",
            Event::GuestSeated(_) => "guest_seated",
            Event::ReservationCompleted(_) => "reservation_completed",
            Event::ReservationCancelled(_) => "reservation_cancelled",
            Event::ReservationNoShow(_) => "reservation_no_show",
            Event::ReservationExpired(_) => "reservation_expired",
            Event::NotificationQueued(_) => "notification_queued",
        }
    }

    /// Get the reservation ID the event concerns
    pub fn reservation_id(&self) -> &str {
        match self {
            Event::ReservationCreated(e)
            | Event::ReservationConfirmed(e)
            | Event::ReservationUpdated(e)
            | Event::ReservationNoShow(e)
            | Event::ReservationExpired(e) => &e.reservation_id,
            Event::GuestSeated(e) => &e.reservation_id,
            Event::ReservationCompleted(e) => &e.reservation_id,
            Event::ReservationCancelled(e) => &e.reservation_id,
            Event::NotificationQueued(e) => &e.reservation_id,
        }
    }
}

/// Snapshot of a reservation's scheduling facts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationEvent {
    pub reservation_id: String,
    pub confirmation_code: String,
    pub table_number: u32,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub party_size: u32,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&Reservation> for ReservationEvent {
    fn from(r: &Reservation) -> Self {
        Self {
            reservation_id: r.id.clone(),
            confirmation_code: r.confirmation_code.clone(),
            table_number: r.table_number,
            date: r.date,
            time: r.time,
            party_size: r.party_size,
            status: r.status.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Guest seated event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatedEvent {
    pub reservation_id: String,
    pub table_number: u32,
    pub timestamp: DateTime<Utc>,
}

/// Visit completed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedEvent {
    pub reservation_id: String,
    pub table_number: u32,
    pub actual_spend: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// Reservation cancelled event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelledEvent {
    pub reservation_id: String,
    pub table_number: u32,
    pub reason: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Notification queued event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub reservation_id: String,
    /// "confirmation", "reminder_24h", "reminder_2h", "cancellation", "follow_up"
    pub kind: String,
    pub timestamp: DateTime<Utc>,
}

/// Wrapper for sending events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}
