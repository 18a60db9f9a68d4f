//! Availability DTOs

use serde::Deserialize;

/// Query for the time-slot listing
#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    /// Target date, `YYYY-MM-DD`
    pub date: String,
    /// Requested visit length; configured default when omitted
    pub duration_minutes: Option<i64>,
    pub party_size: Option<u32>,
}

/// Query for the calendar view
#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    /// Explicit month as `YYYY-MM`; booking window when omitted
    pub month: Option<String>,
}
