//! Conflict evaluation for candidate booking intervals
//!
//! The single source of truth for "is this table free at this time".
//! Booking creation, booking updates and every availability query all go
//! through [`ConflictEvaluator`] so they cannot disagree.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use super::clock;
use crate::domain::{DomainResult, RepositoryProvider, Reservation, Table, TableStatus};

/// Standard half-open interval overlap test: `[a1, a2)` and `[b1, b2)`
/// conflict iff `a1 < b2 && b1 < a2`. Touching intervals do not overlap.
pub fn intervals_overlap(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

pub struct ConflictEvaluator {
    repos: Arc<dyn RepositoryProvider>,
}

impl ConflictEvaluator {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Whether `table` can host a party of `party_size` for the candidate
    /// interval starting at `date`+`time`.
    ///
    /// `exclude_reservation_id` removes the reservation currently being
    /// updated from the conflict check, so it does not collide with itself.
    pub async fn is_free(
        &self,
        table: &Table,
        date: NaiveDate,
        time: NaiveTime,
        duration_minutes: i64,
        party_size: u32,
        exclude_reservation_id: Option<&str>,
    ) -> DomainResult<bool> {
        if !table.fits(party_size) {
            return Ok(false);
        }
        if !table.status.is_in_service() {
            return Ok(false);
        }
        // A currently-seated party always blocks, regardless of interval math.
        if table.status == TableStatus::Occupied {
            return Ok(false);
        }

        let conflict = self
            .find_conflict(&table.id, date, time, duration_minutes, exclude_reservation_id)
            .await?;
        Ok(conflict.is_none())
    }

    /// First reservation whose interval overlaps the candidate interval,
    /// so rejections can name the date/time that is in the way.
    ///
    /// Only non-terminal reservations whose interval has not already elapsed
    /// count; elapsed ones are treated as completed even before the sweeper
    /// has caught up with them.
    pub async fn find_conflict(
        &self,
        table_id: &str,
        date: NaiveDate,
        time: NaiveTime,
        duration_minutes: i64,
        exclude_reservation_id: Option<&str>,
    ) -> DomainResult<Option<Reservation>> {
        let now = clock::now();
        let c_start = NaiveDateTime::new(date, time);
        let c_end = c_start + Duration::minutes(duration_minutes);

        let reservations = self.repos.reservations().find_by_date(date).await?;
        for r in reservations {
            if r.table_id != table_id {
                continue;
            }
            if !r.is_active() {
                continue;
            }
            if exclude_reservation_id == Some(r.id.as_str()) {
                continue;
            }
            if r.has_ended(now) {
                continue;
            }
            if intervals_overlap(c_start, c_end, r.start(), r.end()) {
                return Ok(Some(r));
            }
        }
        Ok(None)
    }
}

// ── Tests ──────────────────────────────────────────────────────
