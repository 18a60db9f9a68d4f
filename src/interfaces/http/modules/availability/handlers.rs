//! Availability HTTP handlers

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;

use crate::application::booking::clock;
use crate::application::booking::{DayAvailability, TableSlots};
use crate::application::AvailabilityService;
use crate::domain::DomainError;
use crate::interfaces::http::common::{domain_error, ApiResponse, ApiResult};

use super::dto::*;

/// Application state for availability handlers.
#[derive(Clone)]
pub struct AvailabilityAppState {
    pub service: Arc<AvailabilityService>,
}

/// `GET /api/v1/availability/slots?date=YYYY-MM-DD`
pub async fn get_time_slots(
    State(state): State<AvailabilityAppState>,
    Query(query): Query<SlotsQuery>,
) -> ApiResult<Vec<TableSlots>> {
    let date = clock::parse_date(&query.date).map_err(domain_error)?;
    let listing = state
        .service
        .time_slots(date, query.duration_minutes, query.party_size)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(listing)))
}

/// `GET /api/v1/availability/calendar[?month=YYYY-MM]`
pub async fn get_calendar(
    State(state): State<AvailabilityAppState>,
    Query(query): Query<CalendarQuery>,
) -> ApiResult<Vec<DayAvailability>> {
    let calendar = match &query.month {
        Some(month) => {
            let (year, month) = parse_month(month).map_err(domain_error)?;
            state
                .service
                .calendar_month(year, month)
                .await
                .map_err(domain_error)?
        }
        None => state.service.calendar_window().await.map_err(domain_error)?,
    };
    Ok(Json(ApiResponse::success(calendar)))
}

fn parse_month(s: &str) -> Result<(i32, u32), DomainError> {
    let invalid = || DomainError::Validation(format!("Invalid month '{}', expected YYYY-MM", s));
    let (year, month) = s.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_parsing() {
        assert_eq!(parse_month("2026-09").unwrap(), (2026, 9));
        assert_eq!(parse_month("2026-12").unwrap(), (2026, 12));
        assert!(parse_month("2026").is_err());
        assert!(parse_month("2026-13").is_err());
        assert!(parse_month("september").is_err());
    }
}
