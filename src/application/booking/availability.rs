//! Availability queries
//!
//! Two presentation shapes over the same conflict evaluator: a per-date,
//! per-table time-slot listing and an aggregate calendar. Listings never
//! include out-of-service tables, and they describe time-specific
//! availability, not the table's current physical occupancy.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use super::clock;
use super::conflict::ConflictEvaluator;
use super::expiry::ExpirySweeper;
use crate::config::BookingPolicy;
use crate::domain::{DomainError, DomainResult, RepositoryProvider, Table};

/// One bookable start time on one table.
#[derive(Debug, Clone, Serialize)]
pub struct TimeSlot {
    pub time: NaiveTime,
    pub available: bool,
    /// How long the table stays free from this start. Equals the requested
    /// duration except for squeeze-in slots, which are shorter.
    pub available_minutes: i64,
}

/// Slot listing for one table on one date.
#[derive(Debug, Clone, Serialize)]
pub struct TableSlots {
    pub table_id: String,
    pub table_number: u32,
    pub capacity: u32,
    pub area: Option<String>,
    pub slots: Vec<TimeSlot>,
}

/// Aggregate availability for one day.
#[derive(Debug, Clone, Serialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub total_tables: usize,
    pub reserved_tables: usize,
    pub available_tables: usize,
}

pub struct AvailabilityService {
    repos: Arc<dyn RepositoryProvider>,
    policy: BookingPolicy,
    conflict: ConflictEvaluator,
    sweeper: ExpirySweeper,
}

impl AvailabilityService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, policy: BookingPolicy) -> Self {
        Self {
            conflict: ConflictEvaluator::new(repos.clone()),
            sweeper: ExpirySweeper::new(repos.clone()),
            repos,
            policy,
        }
    }

    /// Candidate start times at the configured granularity across operating
    /// hours, for every in-service table.
    pub async fn time_slots(
        &self,
        date: NaiveDate,
        duration_minutes: Option<i64>,
        party_size: Option<u32>,
    ) -> DomainResult<Vec<TableSlots>> {
        self.sweeper.sweep().await?;

        let duration = duration_minutes.unwrap_or(self.policy.default_duration_minutes);
        let party = party_size.unwrap_or(self.policy.min_party_size);
        let now = clock::now();

        let tables = self.repos.tables().find_all().await?;
        let day = self.repos.reservations().find_by_date(date).await?;

        let mut listing = Vec::new();
        for table in tables.into_iter().filter(|t| t.status.is_in_service()) {
            let mut intervals: Vec<(NaiveDateTime, NaiveDateTime)> = day
                .iter()
                .filter(|r| r.table_id == table.id && r.is_active() && !r.has_ended(now))
                .map(|r| (r.start(), r.end()))
                .collect();
            intervals.sort_by_key(|(start, _)| *start);

            let mut slots = Vec::new();
            let mut start = self.policy.opening;
            while start < self.policy.closing {
                slots.push(
                    self.evaluate_slot(&table, date, start, duration, party, &intervals)
                        .await?,
                );
                let (next, wrap) =
                    start.overflowing_add_signed(Duration::minutes(self.policy.slot_interval_minutes));
                if wrap != 0 {
                    break;
                }
                start = next;
            }

            listing.push(TableSlots {
                table_id: table.id.clone(),
                table_number: table.number,
                capacity: table.capacity,
                area: table.area.clone(),
                slots,
            });
        }

        Ok(listing)
    }

    async fn evaluate_slot(
        &self,
        table: &Table,
        date: NaiveDate,
        start: NaiveTime,
        duration_minutes: i64,
        party_size: u32,
        intervals: &[(NaiveDateTime, NaiveDateTime)],
    ) -> DomainResult<TimeSlot> {
        if self
            .conflict
            .is_free(table, date, start, duration_minutes, party_size, None)
            .await?
        {
            return Ok(TimeSlot {
                time: start,
                available: true,
                available_minutes: duration_minutes,
            });
        }

        // Squeeze-in: the start instant itself is clear and a minimum run
        // remains before the next booking begins. Shorter than requested,
        // but still worth offering.
        if table.fits(party_size) {
            let c_start = NaiveDateTime::new(date, start);
            let covered = intervals
                .iter()
                .any(|(s, e)| *s <= c_start && c_start < *e);
            if !covered {
                let next_start = intervals
                    .iter()
                    .map(|(s, _)| *s)
                    .filter(|s| *s > c_start)
                    .min();
                if let Some(next_start) = next_start {
                    let gap = (next_start - c_start).num_minutes();
                    if gap >= self.policy.min_slot_gap_minutes {
                        return Ok(TimeSlot {
                            time: start,
                            available: true,
                            available_minutes: gap.min(duration_minutes),
                        });
                    }
                }
            }
        }

        Ok(TimeSlot {
            time: start,
            available: false,
            available_minutes: 0,
        })
    }

    /// Per-day table counts over the whole booking window.
    pub async fn calendar_window(&self) -> DomainResult<Vec<DayAvailability>> {
        let (from, to) = clock::valid_booking_range(self.policy.booking_window_days);
        self.build_calendar(from, (to - from).num_days() + 1).await
    }

    /// Per-day table counts for an explicit month.
    pub async fn calendar_month(&self, year: i32, month: u32) -> DomainResult<Vec<DayAvailability>> {
        let from = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| DomainError::Validation(format!("Invalid month {}-{}", year, month)))?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| DomainError::Validation(format!("Invalid month {}-{}", year, month)))?;

        self.build_calendar(from, (next_month - from).num_days()).await
    }

    async fn build_calendar(&self, from: NaiveDate, days: i64) -> DomainResult<Vec<DayAvailability>> {
        self.sweeper.sweep().await?;

        let tables: Vec<Table> = self
            .repos
            .tables()
            .find_all()
            .await?
            .into_iter()
            .filter(|t| t.status.is_in_service())
            .collect();
        let total = tables.len();
        let now = clock::now();

        let mut calendar = Vec::with_capacity(days.max(0) as usize);
        for offset in 0..days {
            let date = from + Duration::days(offset);
            let day = self.repos.reservations().find_by_date(date).await?;
            let booked: HashSet<&str> = day
                .iter()
                .filter(|r| r.is_active() && !r.has_ended(now))
                .map(|r| r.table_id.as_str())
                .collect();
            let reserved = tables.iter().filter(|t| booked.contains(t.id.as_str())).count();

            calendar.push(DayAvailability {
                date,
                total_tables: total,
                reserved_tables: reserved,
                available_tables: total - reserved,
            });
        }

        Ok(calendar)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::booking::testutil::{
        future_date, repos, reservation, table, time,
    };
    use crate::domain::TableStatus;

    fn slot_at(slots: &TableSlots, at: NaiveTime) -> &TimeSlot {
        slots
            .slots
            .iter()
            .find(|s| s.time == at)
            .expect("slot should exist")
    }

    fn availability(repos: &Arc<dyn RepositoryProvider>) -> AvailabilityService {
        AvailabilityService::new(repos.clone(), BookingPolicy::default())
    }

    #[tokio::test]
    async fn slots_cover_operating_hours() {
        let repos = repos();
        table(&repos, 1, 4).await;

        let listing = availability(&repos)
            .time_slots(future_date(3), None, None)
            .await
            .unwrap();
        assert_eq!(listing.len(), 1);
        // 08:00..22:00 at 30-minute steps
        assert_eq!(listing[0].slots.len(), 28);
        assert_eq!(listing[0].slots[0].time, time(8, 0));
        assert_eq!(listing[0].slots[27].time, time(21, 30));
        assert!(listing[0].slots.iter().all(|s| s.available));
    }

    #[tokio::test]
    async fn booked_interval_shapes_the_slot_list() {
        let repos = repos();
        let t = table(&repos, 1, 4).await;
        let date = future_date(3);
        reservation(&repos, &t, date, time(20, 0), 120).await; // [20:00, 22:00)

        let listing = availability(&repos)
            .time_slots(date, Some(120), Some(2))
            .await
            .unwrap();
        let slots = &listing[0];

        // morning untouched
        let morning = slot_at(slots, time(8, 0));
        assert!(morning.available);
        assert_eq!(morning.available_minutes, 120);

        // adjacency: [18:00, 20:00) touches the booking, full duration fits
        let adjacent = slot_at(slots, time(18, 0));
        assert!(adjacent.available);
        assert_eq!(adjacent.available_minutes, 120);

        // squeeze-in: 90 free minutes before the 20:00 party
        let squeeze = slot_at(slots, time(18, 30));
        assert!(squeeze.available);
        assert_eq!(squeeze.available_minutes, 90);

        // 30 minutes is below the minimum gap
        let too_tight = slot_at(slots, time(19, 30));
        assert!(!too_tight.available);

        // inside the booked interval
        assert!(!slot_at(slots, time(20, 0)).available);
        assert!(!slot_at(slots, time(21, 30)).available);
    }

    #[tokio::test]
    async fn out_of_service_tables_are_not_listed() {
        let repos = repos();
        table(&repos, 1, 4).await;
        let mut blocked = table(&repos, 2, 4).await;
        blocked.status = TableStatus::Maintenance;
        repos.tables().update(blocked).await.unwrap();

        let listing = availability(&repos)
            .time_slots(future_date(3), None, None)
            .await
            .unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].table_number, 1);
    }

    #[tokio::test]
    async fn undersized_tables_offer_no_slots() {
        let repos = repos();
        table(&repos, 1, 2).await;

        let listing = availability(&repos)
            .time_slots(future_date(3), Some(120), Some(6))
            .await
            .unwrap();
        assert!(listing[0].slots.iter().all(|s| !s.available));
    }

    #[tokio::test]
    async fn calendar_window_counts_reserved_tables() {
        let repos = repos();
        let t1 = table(&repos, 1, 4).await;
        table(&repos, 2, 4).await;
        let date = future_date(3);
        reservation(&repos, &t1, date, time(20, 0), 120).await;

        let calendar = availability(&repos).calendar_window().await.unwrap();
        assert_eq!(calendar.len(), 15); // today .. today+14, inclusive

        let day = calendar.iter().find(|d| d.date == date).unwrap();
        assert_eq!(day.total_tables, 2);
        assert_eq!(day.reserved_tables, 1);
        assert_eq!(day.available_tables, 1);

        let empty_day = calendar.iter().find(|d| d.date == future_date(5)).unwrap();
        assert_eq!(empty_day.reserved_tables, 0);
        assert_eq!(empty_day.available_tables, 2);
    }

    #[tokio::test]
    async fn calendar_month_spans_the_whole_month() {
        let repos = repos();
        table(&repos, 1, 4).await;

        let calendar = availability(&repos).calendar_month(2026, 9).await.unwrap();
        assert_eq!(calendar.len(), 30);
        assert_eq!(
            calendar[0].date,
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
        );

        assert!(availability(&repos).calendar_month(2026, 13).await.is_err());
    }

    #[tokio::test]
    async fn occupied_table_is_still_listed_by_time() {
        // The slot list communicates time-specific availability, not the
        // table's current physical occupancy.
        let repos = repos();
        let mut t = table(&repos, 1, 4).await;
        t.status = TableStatus::Occupied;
        repos.tables().update(t.clone()).await.unwrap();
        let date = future_date(3);
        reservation(&repos, &t, date, time(20, 0), 120).await;

        let listing = availability(&repos)
            .time_slots(date, Some(120), Some(2))
            .await
            .unwrap();
        let slots = &listing[0];

        // before the evening booking the run up to 20:00 is offered,
        // capped at the requested duration
        let morning = slot_at(slots, time(8, 0));
        assert!(morning.available);
        assert_eq!(morning.available_minutes, 120);

        let squeeze = slot_at(slots, time(18, 30));
        assert!(squeeze.available);
        assert_eq!(squeeze.available_minutes, 90);

        // inside the booking, and after it with no further booking to
        // squeeze in front of, nothing is offered while the party sits
        assert!(!slot_at(slots, time(20, 0)).available);
        assert!(!slot_at(slots, time(21, 30)).available);
    }
}
