//! Table allocation
//!
//! Two modes: an explicitly requested table (by id or number), or automatic
//! closest-fit selection over the whole inventory.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

use super::conflict::ConflictEvaluator;
use crate::domain::{DomainError, DomainResult, RepositoryProvider, Table};

/// Parameters of one allocation attempt.
#[derive(Debug, Clone, Default)]
pub struct AllocationRequest {
    /// Explicitly requested table, by id
    pub table_id: Option<String>,
    /// Explicitly requested table, by human-facing number
    pub table_number: Option<u32>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: i64,
    pub party_size: u32,
    /// Area preference for automatic selection (case-insensitive substring)
    pub preferred_area: Option<String>,
    /// Reservation being rescheduled, excluded from conflict checks
    pub exclude_reservation_id: Option<String>,
}

pub struct TableAllocator {
    repos: Arc<dyn RepositoryProvider>,
    conflict: ConflictEvaluator,
}

impl TableAllocator {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            conflict: ConflictEvaluator::new(repos.clone()),
            repos,
        }
    }

    /// Pick a table for the request, or explain why none can be granted.
    pub async fn allocate(&self, request: &AllocationRequest) -> DomainResult<Table> {
        if request.table_id.is_some() || request.table_number.is_some() {
            self.allocate_explicit(request).await
        } else {
            self.allocate_automatic(request).await
        }
    }

    async fn allocate_explicit(&self, request: &AllocationRequest) -> DomainResult<Table> {
        let table = match (&request.table_id, request.table_number) {
            (Some(id), _) => self
                .repos
                .tables()
                .find_by_id(id)
                .await?
                .ok_or_else(|| DomainError::not_found("table", "id", id.clone()))?,
            (None, Some(number)) => self
                .repos
                .tables()
                .find_by_number(number)
                .await?
                .ok_or_else(|| {
                    DomainError::not_found("table", "number", number.to_string())
                })?,
            (None, None) => unreachable!("allocate_explicit requires a table reference"),
        };

        if !table.fits(request.party_size) {
            return Err(DomainError::Validation(format!(
                "Table {} seats {}, party of {} does not fit",
                table.number, table.capacity, request.party_size
            )));
        }
        if !table.status.is_in_service() {
            return Err(DomainError::Conflict(format!(
                "Table {} is out of service ({})",
                table.number, table.status
            )));
        }

        let free = self
            .conflict
            .is_free(
                &table,
                request.date,
                request.time,
                request.duration_minutes,
                request.party_size,
                request.exclude_reservation_id.as_deref(),
            )
            .await?;
        if !free {
            // Name the conflicting booking when there is one to name
            let conflict = self
                .conflict
                .find_conflict(
                    &table.id,
                    request.date,
                    request.time,
                    request.duration_minutes,
                    request.exclude_reservation_id.as_deref(),
                )
                .await?;
            let message = match conflict {
                Some(r) => format!(
                    "Table {} is already booked on {} at {}",
                    table.number,
                    r.date,
                    r.time.format("%H:%M")
                ),
                None => format!("Table {} is not available", table.number),
            };
            return Err(DomainError::Conflict(message));
        }

        Ok(table)
    }

    /// Closest-fit automatic selection: smallest `capacity - party_size`
    /// first, ties broken by directory order, first free candidate wins.
    /// Keeps large tables for large parties.
    async fn allocate_automatic(&self, request: &AllocationRequest) -> DomainResult<Table> {
        let mut candidates: Vec<Table> = self
            .repos
            .tables()
            .find_all()
            .await?
            .into_iter()
            .filter(|t| t.fits(request.party_size))
            .filter(|t| t.status.is_in_service())
            .filter(|t| match &request.preferred_area {
                Some(area) => t.area_matches(area),
                None => true,
            })
            .collect();

        // sort is stable, so equal fits keep directory order
        candidates.sort_by_key(|t| t.capacity - request.party_size);

        for table in candidates {
            let free = self
                .conflict
                .is_free(
                    &table,
                    request.date,
                    request.time,
                    request.duration_minutes,
                    request.party_size,
                    request.exclude_reservation_id.as_deref(),
                )
                .await?;
            if free {
                debug!(
                    table_number = table.number,
                    capacity = table.capacity,
                    party_size = request.party_size,
                    "Table allocated"
                );
                return Ok(table);
            }
        }

        Err(DomainError::AllocationFailed(format!(
            "No table available for party of {} on {} at {}",
            request.party_size,
            request.date,
            request.time.format("%H:%M")
        )))
    }
}

// ── Tests ──────────────────────────────────────────────────────
