//! Clock and calendar helpers
//!
//! All date/time arithmetic in the system is site-local wall-clock time;
//! nothing converts across timezones. Predicates take `now` as a parameter
//! so tests can pin time without a mock clock.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::{DomainError, DomainResult};

/// Site-local wall-clock time.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Site-local date.
pub fn today() -> NaiveDate {
    now().date()
}

/// The date range bookings are accepted for: `[today, today + window]`,
/// both ends inclusive.
pub fn valid_booking_range(window_days: i64) -> (NaiveDate, NaiveDate) {
    let start = today();
    (start, start + Duration::days(window_days))
}

/// End instant of the interval starting at `date`+`time` (exclusive).
pub fn interval_end(date: NaiveDate, time: NaiveTime, duration_minutes: i64) -> NaiveDateTime {
    NaiveDateTime::new(date, time) + Duration::minutes(duration_minutes)
}

/// Whether the interval has fully elapsed as of `now` (strictly after its end).
pub fn has_ended(
    date: NaiveDate,
    time: NaiveTime,
    duration_minutes: i64,
    now: NaiveDateTime,
) -> bool {
    now > interval_end(date, time, duration_minutes)
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| DomainError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", s)))
}

/// Parse a 24-hour `HH:mm` time.
pub fn parse_time(s: &str) -> DomainResult<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| DomainError::Validation(format!("Invalid time '{}', expected HH:mm", s)))
}

// ── Tests ──────────────────────────────────────────────────────
