//! Reservation domain entity

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Requested but not yet confirmed
    Pending,
    /// Confirmed booking, table held
    Confirmed,
    /// Party has arrived and is at the table
    Seated,
    /// Visit finished (explicitly or by lazy expiration)
    Completed,
    /// Cancelled by customer or staff
    Cancelled,
    /// Party never arrived
    NoShow,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Seated => "seated",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "seated" => Some(Self::Seated),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            "no_show" => Some(Self::NoShow),
            _ => None,
        }
    }

    /// Terminal statuses never leave their state again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inline customer snapshot captured at booking time.
///
/// Used for walk-in style bookings without an account; immutable once set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerContact {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

/// Key used to group a customer's reservations for limit enforcement.
/// Either an internal customer id, a phone number, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerKey {
    pub customer_id: Option<String>,
    pub phone: Option<String>,
}

impl CustomerKey {
    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none() && self.phone.is_none()
    }

    /// Whether the given reservation belongs to this customer.
    pub fn matches(&self, reservation: &Reservation) -> bool {
        if let (Some(id), Some(rid)) = (&self.customer_id, &reservation.customer_id) {
            if id == rid {
                return true;
            }
        }
        if let (Some(phone), Some(contact)) = (&self.phone, &reservation.contact) {
            if *phone == contact.phone {
                return true;
            }
        }
        false
    }
}

/// Table reservation entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    /// Unique identifier
    pub id: String,
    /// Short customer-facing code for self-service lookup, `[A-Z0-9]{6}`
    pub confirmation_code: String,
    /// Internal customer identity, if the booking is account-linked
    pub customer_id: Option<String>,
    /// Inline contact snapshot, if booked without an account
    pub contact: Option<CustomerContact>,
    /// Allocated table
    pub table_id: String,
    /// Table number, denormalized for display
    pub table_number: u32,
    /// Target date
    pub date: NaiveDate,
    /// Target start time
    pub time: NaiveTime,
    /// Length of the visit in minutes
    pub duration_minutes: i64,
    /// Number of guests
    pub party_size: u32,
    /// Seating area the customer asked for, if any
    pub preferred_area: Option<String>,
    /// Current status
    pub status: ReservationStatus,
    /// Free-text wishes ("birthday cake", ...)
    pub special_requests: Option<String>,
    pub allergies: Option<String>,
    pub dietary_restrictions: Option<String>,
    /// Priority guest flag (VIP, regulars)
    pub priority: bool,
    pub estimated_spend: Option<f64>,
    /// Actual spend recorded on completion
    pub actual_spend: Option<f64>,
    /// Internal staff notes
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    /// Identity of whoever created/last updated the record, when known
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub seated_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub no_show_at: Option<DateTime<Utc>>,
}

impl Reservation {
    /// Start instant of the derived interval.
    pub fn start(&self) -> NaiveDateTime {
        NaiveDateTime::new(self.date, self.time)
    }

    /// End instant of the derived interval (exclusive).
    pub fn end(&self) -> NaiveDateTime {
        self.start() + Duration::minutes(self.duration_minutes)
    }

    /// Whether the derived interval has fully elapsed as of `now`.
    pub fn has_ended(&self, now: NaiveDateTime) -> bool {
        now > self.end()
    }

    /// Non-terminal reservations hold their table.
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Grouping key for the booking-limit guard.
    pub fn customer_key(&self) -> CustomerKey {
        CustomerKey {
            customer_id: self.customer_id.clone(),
            phone: self.contact.as_ref().map(|c| c.phone.clone()),
        }
    }

    pub fn confirm(&mut self) {
        self.status = ReservationStatus::Confirmed;
        self.updated_at = Utc::now();
    }

    pub fn seat(&mut self) {
        self.status = ReservationStatus::Seated;
        self.seated_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    pub fn complete(&mut self, actual_spend: Option<f64>) {
        self.status = ReservationStatus::Completed;
        if actual_spend.is_some() {
            self.actual_spend = actual_spend;
        }
        self.completed_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    pub fn cancel(&mut self, reason: Option<String>) {
        self.status = ReservationStatus::Cancelled;
        self.cancellation_reason = reason;
        self.cancelled_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    pub fn mark_no_show(&mut self) {
        self.status = ReservationStatus::NoShow;
        self.no_show_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_reservation() -> Reservation {
        Reservation {
            id: "res-1".to_string(),
            confirmation_code: "A1B2C3".to_string(),
            customer_id: Some("cust-1".to_string()),
            contact: Some(CustomerContact {
                name: "Alice".to_string(),
                phone: "+100200300".to_string(),
                email: None,
            }),
            table_id: "tbl-1".to_string(),
            table_number: 4,
            date: NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
            time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            duration_minutes: 120,
            party_size: 4,
            preferred_area: None,
            status: ReservationStatus::Confirmed,
            special_requests: None,
            allergies: None,
            dietary_restrictions: None,
            priority: false,
            estimated_spend: None,
            actual_spend: None,
            notes: None,
            cancellation_reason: None,
            created_by: None,
            updated_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            seated_at: None,
            completed_at: None,
            cancelled_at: None,
            no_show_at: None,
        }
    }

    #[test]
    fn derived_interval_is_half_open() {
        let r = sample_reservation();
        assert_eq!(
            r.start(),
            NaiveDate::from_ymd_opt(2025, 12, 15)
                .unwrap()
                .and_hms_opt(20, 0, 0)
                .unwrap()
        );
        assert_eq!(
            r.end(),
            NaiveDate::from_ymd_opt(2025, 12, 15)
                .unwrap()
                .and_hms_opt(22, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn has_ended_is_strictly_after_end() {
        let r = sample_reservation();
        let end = r.end();
        assert!(!r.has_ended(end)); // exactly at the end: not yet elapsed
        assert!(r.has_ended(end + Duration::seconds(1)));
        assert!(!r.has_ended(end - Duration::minutes(1)));
    }

    #[test]
    fn terminal_statuses_are_not_active() {
        let mut r = sample_reservation();
        assert!(r.is_active());
        r.complete(Some(84.50));
        assert!(!r.is_active());
        assert_eq!(r.actual_spend, Some(84.50));
        assert!(r.completed_at.is_some());
    }

    #[test]
    fn cancel_records_reason() {
        let mut r = sample_reservation();
        r.cancel(Some("customer called".to_string()));
        assert_eq!(r.status, ReservationStatus::Cancelled);
        assert_eq!(r.cancellation_reason.as_deref(), Some("customer called"));
        assert!(r.cancelled_at.is_some());
    }

    #[test]
    fn customer_key_matches_by_id_or_phone() {
        let r = sample_reservation();

        let by_id = CustomerKey {
            customer_id: Some("cust-1".to_string()),
            phone: None,
        };
        assert!(by_id.matches(&r));

        let by_phone = CustomerKey {
            customer_id: None,
            phone: Some("+100200300".to_string()),
        };
        assert!(by_phone.matches(&r));

        let other = CustomerKey {
            customer_id: Some("cust-2".to_string()),
            phone: Some("+999".to_string()),
        };
        assert!(!other.matches(&r));
        assert!(!CustomerKey::default().matches(&r));
    }

    #[test]
    fn status_string_roundtrip() {
        for status in &[
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::Seated,
            ReservationStatus::Completed,
            ReservationStatus::Cancelled,
            ReservationStatus::NoShow,
        ] {
            assert_eq!(ReservationStatus::from_str(status.as_str()), Some(*status));
        }
        assert_eq!(ReservationStatus::from_str("unknown"), None);
    }
}
