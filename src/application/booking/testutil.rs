//! Shared fixtures for booking engine tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};

use super::clock;
use super::hooks::{CustomerStatsUpdater, NotificationScheduler, ReminderLead};
use crate::config::BookingPolicy;
use crate::domain::{
    CustomerContact, CustomerKey, DomainResult, RepositoryProvider, Reservation,
    ReservationStatus, Table,
};
use crate::infrastructure::storage::InMemoryRepositoryProvider;

pub(crate) fn repos() -> Arc<dyn RepositoryProvider> {
    Arc::new(InMemoryRepositoryProvider::new())
}

pub(crate) fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// A date safely inside the booking window.
pub(crate) fn future_date(days_from_today: i64) -> NaiveDate {
    clock::today() + Duration::days(days_from_today)
}

pub(crate) async fn table(repos: &Arc<dyn RepositoryProvider>, number: u32, capacity: u32) -> Table {
    let t = Table::new(number, capacity);
    repos.tables().save(t.clone()).await.unwrap();
    t
}

pub(crate) async fn table_in_area(
    repos: &Arc<dyn RepositoryProvider>,
    number: u32,
    capacity: u32,
    area: &str,
) -> Table {
    let mut t = Table::new(number, capacity);
    t.area = Some(area.to_string());
    repos.tables().save(t.clone()).await.unwrap();
    t
}

/// Build a confirmed reservation for the given table without saving it.
pub(crate) fn build_reservation(
    table: &Table,
    date: NaiveDate,
    time: NaiveTime,
    duration_minutes: i64,
) -> Reservation {
    Reservation {
        id: uuid::Uuid::new_v4().to_string(),
        confirmation_code: "TEST01".to_string(),
        customer_id: None,
        contact: Some(CustomerContact {
            name: "Guest".to_string(),
            phone: "+10000001".to_string(),
            email: None,
        }),
        table_id: table.id.clone(),
        table_number: table.number,
        date,
        time,
        duration_minutes,
        party_size: 2,
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

pub(crate) async fn reservation(
    repos: &Arc<dyn RepositoryProvider>,
    table: &Table,
    date: NaiveDate,
    time: NaiveTime,
    duration_minutes: i64,
) -> Reservation {
    let r = build_reservation(table, date, time, duration_minutes);
    repos.reservations().save(r.clone()).await.unwrap();
    r
}

// ── Hook doubles ────────────────────────────────────────────────

/// Scheduler that records which notifications were requested.
#[derive(Default)]
pub(crate) struct RecordingScheduler {
    pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl NotificationScheduler for RecordingScheduler {
    async fn schedule_confirmation(&self, _reservation: &Reservation) -> DomainResult<()> {
        self.calls.lock().unwrap().push("confirmation".to_string());
        Ok(())
    }

    async fn schedule_reminder(
        &self,
        _reservation: &Reservation,
        lead: ReminderLead,
    ) -> DomainResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("reminder_{}", lead.as_str()));
        Ok(())
    }

    async fn schedule_cancellation(&self, _reservation: &Reservation) -> DomainResult<()> {
        self.calls.lock().unwrap().push("cancellation".to_string());
        Ok(())
    }

    async fn schedule_follow_up(&self, _reservation: &Reservation) -> DomainResult<()> {
        self.calls.lock().unwrap().push("follow_up".to_string());
        Ok(())
    }
}

/// Stats sink that records completed visits.
#[derive(Default)]
pub(crate) struct RecordingStats {
    pub visits: Mutex<Vec<(CustomerKey, Option<f64>)>>,
}

#[async_trait]
impl CustomerStatsUpdater for RecordingStats {
    async fn record_completed_visit(
        &self,
        customer: &CustomerKey,
        spend: Option<f64>,
    ) -> DomainResult<()> {
        self.visits.lock().unwrap().push((customer.clone(), spend));
        Ok(())
    }
}

/// Scheduler whose every call fails, for checking that notification
/// failures never surface to the caller.
pub(crate) struct FailingScheduler;

#[async_trait]
impl NotificationScheduler for FailingScheduler {
    async fn schedule_confirmation(&self, _r: &Reservation) -> DomainResult<()> {
        Err(crate::domain::DomainError::Internal("smtp down".into()))
    }

    async fn schedule_reminder(&self, _r: &Reservation, _lead: ReminderLead) -> DomainResult<()> {
        Err(crate::domain::DomainError::Internal("smtp down".into()))
    }

    async fn schedule_cancellation(&self, _r: &Reservation) -> DomainResult<()> {
        Err(crate::domain::DomainError::Internal("smtp down".into()))
    }

    async fn schedule_follow_up(&self, _r: &Reservation) -> DomainResult<()> {
        Err(crate::domain::DomainError::Internal("smtp down".into()))
    }
}

/// Fully wired lifecycle service with recording hooks.
pub(crate) fn service(
    repos: &Arc<dyn RepositoryProvider>,
) -> (
    super::lifecycle::ReservationService,
    Arc<RecordingScheduler>,
    Arc<RecordingStats>,
) {
    let scheduler = Arc::new(RecordingScheduler::default());
    let stats = Arc::new(RecordingStats::default());
    let svc = super::lifecycle::ReservationService::new(
        repos.clone(),
        BookingPolicy::default(),
        scheduler.clone(),
        stats.clone(),
        crate::notifications::create_event_bus(),
    );
    (svc, scheduler, stats)
}
