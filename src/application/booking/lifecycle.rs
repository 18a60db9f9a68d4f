//! Reservation lifecycle
//!
//! `ReservationService` owns the reservation state machine and is the only
//! writer of reservation records and table statuses. Every mutation
//! validates first and writes after, so business-rule failures leave no
//! partial state behind.
//!
//! States: `pending → confirmed → seated → completed`, with `cancelled`
//! and `no_show` as the other terminal exits. Bookings are created
//! pre-confirmed.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use tracing::{info, warn};

use super::allocator::{AllocationRequest, TableAllocator};
use super::clock;
use super::codes;
use super::expiry::ExpirySweeper;
use super::hooks::{CustomerStatsUpdater, NotificationScheduler, ReminderLead};
use super::limits::BookingLimitGuard;
use crate::config::BookingPolicy;
use crate::domain::{
    CustomerContact, CustomerKey, DomainError, DomainResult, RepositoryProvider, Reservation,
    ReservationStatus, TableStatus,
};
use crate::notifications::events::{
    CancelledEvent, CompletedEvent, Event, ReservationEvent, SeatedEvent,
};
use crate::notifications::SharedEventBus;

/// Input for creating a reservation.
#[derive(Debug, Clone, Default)]
pub struct CreateReservation {
    pub customer_id: Option<String>,
    pub contact: Option<CustomerContact>,
    /// Explicit table request, by id
    pub table_id: Option<String>,
    /// Explicit table request, by number
    pub table_number: Option<u32>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Defaults to the configured visit length when omitted
    pub duration_minutes: Option<i64>,
    pub party_size: u32,
    pub preferred_area: Option<String>,
    pub special_requests: Option<String>,
    pub allergies: Option<String>,
    pub dietary_restrictions: Option<String>,
    pub priority: bool,
    pub estimated_spend: Option<f64>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
}

/// Partial update; `None` fields stay untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateReservation {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub duration_minutes: Option<i64>,
    pub party_size: Option<u32>,
    pub table_id: Option<String>,
    pub table_number: Option<u32>,
    pub preferred_area: Option<String>,
    pub special_requests: Option<String>,
    pub allergies: Option<String>,
    pub dietary_restrictions: Option<String>,
    pub priority: Option<bool>,
    pub estimated_spend: Option<f64>,
    pub notes: Option<String>,
    pub updated_by: Option<String>,
}

impl UpdateReservation {
    /// Whether any field affecting the table allocation is being edited.
    fn touches_schedule(&self) -> bool {
        self.date.is_some()
            || self.time.is_some()
            || self.duration_minutes.is_some()
            || self.party_size.is_some()
            || self.table_id.is_some()
            || self.table_number.is_some()
            || self.preferred_area.is_some()
    }
}

pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
    policy: BookingPolicy,
    allocator: TableAllocator,
    limits: BookingLimitGuard,
    sweeper: ExpirySweeper,
    notifier: Arc<dyn NotificationScheduler>,
    stats: Arc<dyn CustomerStatsUpdater>,
    event_bus: SharedEventBus,
}

impl ReservationService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        policy: BookingPolicy,
        notifier: Arc<dyn NotificationScheduler>,
        stats: Arc<dyn CustomerStatsUpdater>,
        event_bus: SharedEventBus,
    ) -> Self {
        Self {
            allocator: TableAllocator::new(repos.clone()),
            limits: BookingLimitGuard::new(repos.clone(), &policy),
            sweeper: ExpirySweeper::new(repos.clone()).with_event_bus(event_bus.clone()),
            repos,
            policy,
            notifier,
            stats,
            event_bus,
        }
    }

    // ── Create ──────────────────────────────────────────────────

    pub async fn create(&self, cmd: CreateReservation) -> DomainResult<Reservation> {
        if cmd.customer_id.is_none() && cmd.contact.is_none() {
            return Err(DomainError::Validation(
                "Either customer_id or contact details are required".to_string(),
            ));
        }
        if let Some(contact) = &cmd.contact {
            if contact.name.trim().is_empty() || contact.phone.trim().is_empty() {
                return Err(DomainError::Validation(
                    "Contact name and phone must not be empty".to_string(),
                ));
            }
        }
        let duration = cmd
            .duration_minutes
            .unwrap_or(self.policy.default_duration_minutes);
        self.validate_schedule(cmd.date, cmd.time, duration, cmd.party_size)?;

        self.sweeper.sweep().await?;

        let customer = CustomerKey {
            customer_id: cmd.customer_id.clone(),
            phone: cmd.contact.as_ref().map(|c| c.phone.clone()),
        };
        self.limits.check(&customer, cmd.date, cmd.time, None).await?;

        let table = self
            .allocator
            .allocate(&AllocationRequest {
                table_id: cmd.table_id.clone(),
                table_number: cmd.table_number,
                date: cmd.date,
                time: cmd.time,
                duration_minutes: duration,
                party_size: cmd.party_size,
                preferred_area: cmd.preferred_area.clone(),
                exclude_reservation_id: None,
            })
            .await?;

        let code = codes::generate_unique(self.repos.reservations()).await?;
        let now = Utc::now();
        let reservation = Reservation {
            id: uuid::Uuid::new_v4().to_string(),
            confirmation_code: code,
            customer_id: cmd.customer_id,
            contact: cmd.contact,
            table_id: table.id.clone(),
            table_number: table.number,
            date: cmd.date,
            time: cmd.time,
            duration_minutes: duration,
            party_size: cmd.party_size,
            preferred_area: cmd.preferred_area,
            status: ReservationStatus::Confirmed,
            special_requests: cmd.special_requests,
            allergies: cmd.allergies,
            dietary_restrictions: cmd.dietary_restrictions,
            priority: cmd.priority,
            estimated_spend: cmd.estimated_spend,
            actual_spend: None,
            notes: cmd.notes,
            cancellation_reason: None,
            created_by: cmd.created_by.clone(),
            updated_by: cmd.created_by,
            created_at: now,
            updated_at: now,
            seated_at: None,
            completed_at: None,
            cancelled_at: None,
            no_show_at: None,
        };

        self.repos.reservations().save(reservation.clone()).await?;
        self.repos
            .tables()
            .set_status(&table.id, TableStatus::Reserved, Some(reservation.id.clone()))
            .await?;

        info!(
            reservation_id = %reservation.id,
            confirmation_code = %reservation.confirmation_code,
            table_number = table.number,
            date = %reservation.date,
            time = %reservation.time.format("%H:%M"),
            party_size = reservation.party_size,
            "Reservation created"
        );
        metrics::counter!("reservations_created_total").increment(1);

        self.fire(
            self.notifier.schedule_confirmation(&reservation).await,
            "confirmation",
        );
        self.fire(
            self.notifier
                .schedule_reminder(&reservation, ReminderLead::H24)
                .await,
            "reminder_24h",
        );
        self.fire(
            self.notifier
                .schedule_reminder(&reservation, ReminderLead::H2)
                .await,
            "reminder_2h",
        );

        self.event_bus
            .publish(Event::ReservationCreated(ReservationEvent::from(&reservation)));

        Ok(reservation)
    }

    // ── Reads ───────────────────────────────────────────────────

    pub async fn get(&self, id: &str) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("reservation", "id", id))
    }

    /// Customer self-service lookup by confirmation code.
    pub async fn get_by_code(&self, code: &str) -> DomainResult<Reservation> {
        let normalized = codes::normalize(code);
        self.repos
            .reservations()
            .find_by_confirmation_code(&normalized)
            .await?
            .ok_or_else(|| {
                DomainError::not_found("reservation", "confirmation_code", normalized.clone())
            })
    }

    pub async fn list_by_date(&self, date: NaiveDate) -> DomainResult<Vec<Reservation>> {
        self.sweeper.sweep().await?;
        self.repos.reservations().find_by_date(date).await
    }

    pub async fn list_by_customer(&self, customer: &CustomerKey) -> DomainResult<Vec<Reservation>> {
        self.repos.reservations().find_by_customer(customer).await
    }

    /// Active reservations whose interval has not yet elapsed.
    pub async fn list_upcoming(&self) -> DomainResult<Vec<Reservation>> {
        self.sweeper.sweep().await?;
        let now = clock::now();
        let mut upcoming: Vec<Reservation> = self
            .repos
            .reservations()
            .find_active()
            .await?
            .into_iter()
            .filter(|r| !r.has_ended(now))
            .collect();
        upcoming.sort_by_key(|r| (r.date, r.time));
        Ok(upcoming)
    }

    // ── Update ──────────────────────────────────────────────────

    /// Edit a non-terminal reservation. Schedule-relevant edits re-run
    /// allocation (excluding the reservation itself); if no table satisfies
    /// the new parameters the whole update is rejected and nothing changes.
    pub async fn update(&self, id: &str, cmd: UpdateReservation) -> DomainResult<Reservation> {
        self.sweeper.sweep().await?;

        let mut reservation = self.get(id).await?;
        if reservation.status.is_terminal() {
            return Err(DomainError::InvalidStateTransition {
                action: "update",
                status: reservation.status.to_string(),
            });
        }

        let date = cmd.date.unwrap_or(reservation.date);
        let time = cmd.time.unwrap_or(reservation.time);
        let duration = cmd.duration_minutes.unwrap_or(reservation.duration_minutes);
        let party_size = cmd.party_size.unwrap_or(reservation.party_size);
        let preferred_area = cmd
            .preferred_area
            .clone()
            .or_else(|| reservation.preferred_area.clone());

        let mut moved_from: Option<String> = None;
        if cmd.touches_schedule() {
            self.validate_schedule(date, time, duration, party_size)?;
            if date != reservation.date || time != reservation.time {
                self.limits
                    .check(
                        &reservation.customer_key(),
                        date,
                        time,
                        Some(reservation.id.as_str()),
                    )
                    .await?;
            }

            let table = self
                .allocator
                .allocate(&AllocationRequest {
                    table_id: cmd.table_id.clone(),
                    table_number: cmd.table_number,
                    date,
                    time,
                    duration_minutes: duration,
                    party_size,
                    preferred_area: preferred_area.clone(),
                    exclude_reservation_id: Some(reservation.id.clone()),
                })
                .await?;

            if table.id != reservation.table_id {
                moved_from = Some(reservation.table_id.clone());
            }
            reservation.date = date;
            reservation.time = time;
            reservation.duration_minutes = duration;
            reservation.party_size = party_size;
            reservation.preferred_area = preferred_area;
            reservation.table_id = table.id;
            reservation.table_number = table.number;
        }

        if let Some(v) = cmd.special_requests {
            reservation.special_requests = Some(v);
        }
        if let Some(v) = cmd.allergies {
            reservation.allergies = Some(v);
        }
        if let Some(v) = cmd.dietary_restrictions {
            reservation.dietary_restrictions = Some(v);
        }
        if let Some(v) = cmd.priority {
            reservation.priority = v;
        }
        if let Some(v) = cmd.estimated_spend {
            reservation.estimated_spend = Some(v);
        }
        if let Some(v) = cmd.notes {
            reservation.notes = Some(v);
        }
        if cmd.updated_by.is_some() {
            reservation.updated_by = cmd.updated_by;
        }
        reservation.updated_at = Utc::now();

        self.repos.reservations().update(reservation.clone()).await?;

        if let Some(old_table_id) = moved_from {
            self.release_table(&old_table_id, &reservation.id).await?;
            let held_as = if reservation.status == ReservationStatus::Seated {
                TableStatus::Occupied
            } else {
                TableStatus::Reserved
            };
            self.repos
                .tables()
                .set_status(&reservation.table_id, held_as, Some(reservation.id.clone()))
                .await?;
        }

        info!(
            reservation_id = %reservation.id,
            table_number = reservation.table_number,
            date = %reservation.date,
            time = %reservation.time.format("%H:%M"),
            "Reservation updated"
        );
        self.event_bus
            .publish(Event::ReservationUpdated(ReservationEvent::from(&reservation)));

        Ok(reservation)
    }

    // ── Transitions ─────────────────────────────────────────────

    pub async fn confirm(&self, id: &str) -> DomainResult<Reservation> {
        let mut reservation = self.get(id).await?;
        if reservation.status != ReservationStatus::Pending {
            return Err(DomainError::InvalidStateTransition {
                action: "confirm",
                status: reservation.status.to_string(),
            });
        }
        reservation.confirm();
        self.repos.reservations().update(reservation.clone()).await?;

        info!(reservation_id = %reservation.id, "Reservation confirmed");
        self.event_bus
            .publish(Event::ReservationConfirmed(ReservationEvent::from(&reservation)));
        Ok(reservation)
    }

    /// Seat the party, optionally at a different table than allocated
    /// (walk-in adjustments by staff on the floor).
    pub async fn seat(
        &self,
        id: &str,
        table_id: Option<String>,
        table_number: Option<u32>,
    ) -> DomainResult<Reservation> {
        self.sweeper.sweep().await?;

        let mut reservation = self.get(id).await?;
        if !matches!(
            reservation.status,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        ) {
            return Err(DomainError::InvalidStateTransition {
                action: "seat",
                status: reservation.status.to_string(),
            });
        }

        let target = match (table_id, table_number) {
            (Some(tid), _) => self
                .repos
                .tables()
                .find_by_id(&tid)
                .await?
                .ok_or_else(|| DomainError::not_found("table", "id", tid))?,
            (None, Some(number)) => self
                .repos
                .tables()
                .find_by_number(number)
                .await?
                .ok_or_else(|| DomainError::not_found("table", "number", number.to_string()))?,
            (None, None) => self
                .repos
                .tables()
                .find_by_id(&reservation.table_id)
                .await?
                .ok_or_else(|| {
                    DomainError::not_found("table", "id", reservation.table_id.clone())
                })?,
        };

        let previous_table_id = reservation.table_id.clone();
        reservation.table_id = target.id.clone();
        reservation.table_number = target.number;
        reservation.seat();
        self.repos.reservations().update(reservation.clone()).await?;

        if target.id != previous_table_id {
            self.release_table(&previous_table_id, &reservation.id).await?;
        }
        self.repos
            .tables()
            .set_status(&target.id, TableStatus::Occupied, Some(reservation.id.clone()))
            .await?;

        info!(
            reservation_id = %reservation.id,
            table_number = target.number,
            "Guest seated"
        );
        self.event_bus.publish(Event::GuestSeated(SeatedEvent {
            reservation_id: reservation.id.clone(),
            table_number: target.number,
            timestamp: Utc::now(),
        }));
        Ok(reservation)
    }

    pub async fn complete(
        &self,
        id: &str,
        actual_spend: Option<f64>,
    ) -> DomainResult<Reservation> {
        let mut reservation = self.get(id).await?;
        if reservation.status.is_terminal() {
            return Err(DomainError::InvalidStateTransition {
                action: "complete",
                status: reservation.status.to_string(),
            });
        }
        reservation.complete(actual_spend);
        self.repos.reservations().update(reservation.clone()).await?;
        self.release_table(&reservation.table_id, &reservation.id).await?;

        info!(
            reservation_id = %reservation.id,
            spend = reservation.actual_spend.unwrap_or(0.0),
            "Reservation completed"
        );
        metrics::counter!("reservations_completed_total").increment(1);

        let customer = reservation.customer_key();
        if !customer.is_empty() {
            self.fire(
                self.stats
                    .record_completed_visit(&customer, reservation.actual_spend)
                    .await,
                "customer_stats",
            );
        }
        self.fire(
            self.notifier.schedule_follow_up(&reservation).await,
            "follow_up",
        );

        self.event_bus
            .publish(Event::ReservationCompleted(CompletedEvent {
                reservation_id: reservation.id.clone(),
                table_number: reservation.table_number,
                actual_spend: reservation.actual_spend,
                timestamp: Utc::now(),
            }));
        Ok(reservation)
    }

    pub async fn cancel(&self, id: &str, reason: Option<String>) -> DomainResult<Reservation> {
        let mut reservation = self.get(id).await?;
        if reservation.status.is_terminal() {
            return Err(DomainError::InvalidStateTransition {
                action: "cancel",
                status: reservation.status.to_string(),
            });
        }
        reservation.cancel(reason.clone());
        self.repos.reservations().update(reservation.clone()).await?;
        self.release_table(&reservation.table_id, &reservation.id).await?;

        info!(
            reservation_id = %reservation.id,
            reason = reason.as_deref().unwrap_or("-"),
            "Reservation cancelled"
        );
        metrics::counter!("reservations_cancelled_total").increment(1);

        self.fire(
            self.notifier.schedule_cancellation(&reservation).await,
            "cancellation",
        );
        self.event_bus
            .publish(Event::ReservationCancelled(CancelledEvent {
                reservation_id: reservation.id.clone(),
                table_number: reservation.table_number,
                reason,
                timestamp: Utc::now(),
            }));
        Ok(reservation)
    }

    pub async fn mark_no_show(&self, id: &str) -> DomainResult<Reservation> {
        let mut reservation = self.get(id).await?;
        if !matches!(
            reservation.status,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        ) {
            return Err(DomainError::InvalidStateTransition {
                action: "mark no-show",
                status: reservation.status.to_string(),
            });
        }
        reservation.mark_no_show();
        self.repos.reservations().update(reservation.clone()).await?;
        self.release_table(&reservation.table_id, &reservation.id).await?;

        info!(reservation_id = %reservation.id, "Reservation marked no-show");
        self.event_bus
            .publish(Event::ReservationNoShow(ReservationEvent::from(&reservation)));
        Ok(reservation)
    }

    // ── Internals ───────────────────────────────────────────────

    fn validate_schedule(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        duration_minutes: i64,
        party_size: u32,
    ) -> DomainResult<()> {
        let (from, to) = clock::valid_booking_range(self.policy.booking_window_days);
        if date < from || date > to {
            return Err(DomainError::Validation(format!(
                "Date {} is outside the booking window {} to {}",
                date, from, to
            )));
        }
        if time < self.policy.opening || time >= self.policy.closing {
            return Err(DomainError::Validation(format!(
                "Time {} is outside operating hours {}-{}",
                time.format("%H:%M"),
                self.policy.opening.format("%H:%M"),
                self.policy.closing.format("%H:%M"),
            )));
        }
        if duration_minutes < self.policy.min_duration_minutes
            || duration_minutes > self.policy.max_duration_minutes
        {
            return Err(DomainError::Validation(format!(
                "Duration {} minutes is outside the allowed range {}-{}",
                duration_minutes, self.policy.min_duration_minutes, self.policy.max_duration_minutes
            )));
        }
        if party_size < self.policy.min_party_size || party_size > self.policy.max_party_size {
            return Err(DomainError::Validation(format!(
                "Party size {} is outside the allowed range {}-{}",
                party_size, self.policy.min_party_size, self.policy.max_party_size
            )));
        }
        Ok(())
    }

    /// Free a table, unless it has since been handed to another reservation.
    async fn release_table(&self, table_id: &str, reservation_id: &str) -> DomainResult<()> {
        match self.repos.tables().find_by_id(table_id).await? {
            Some(table)
                if table.current_reservation_id.as_deref() == Some(reservation_id) =>
            {
                self.repos
                    .tables()
                    .set_status(table_id, TableStatus::Available, None)
                    .await
            }
            _ => Ok(()),
        }
    }

    /// Best-effort hooks log their failures and never propagate them.
    fn fire(&self, result: DomainResult<()>, hook: &str) {
        if let Err(e) = result {
            warn!(error = %e, hook, "Side-effect hook failed");
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
