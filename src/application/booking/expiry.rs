//! Lazy expiration of elapsed reservations
//!
//! Every availability read, allocation and lifecycle mutation calls
//! [`ExpirySweeper::sweep`] first, so elapsed bookings are corrected at
//! read time. The binary additionally runs the same sweep in a periodic
//! task as a staleness bound; correctness never depends on it.

use std::sync::Arc;

use tokio::time::Duration;
use tracing::{info, warn};

use super::clock;
use crate::domain::{DomainResult, RepositoryProvider, TableStatus};
use crate::notifications::events::{Event, ReservationEvent};
use crate::notifications::SharedEventBus;
use crate::support::shutdown::ShutdownSignal;

pub struct ExpirySweeper {
    repos: Arc<dyn RepositoryProvider>,
    event_bus: Option<SharedEventBus>,
}

impl ExpirySweeper {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            repos,
            event_bus: None,
        }
    }

    pub fn with_event_bus(mut self, event_bus: SharedEventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Transition every non-terminal reservation whose interval has elapsed
    /// to `completed` and free its table. Idempotent; returns how many
    /// reservations were expired.
    pub async fn sweep(&self) -> DomainResult<usize> {
        let now = clock::now();
        let active = self.repos.reservations().find_active().await?;

        let mut expired = 0;
        for mut reservation in active {
            if !reservation.has_ended(now) {
                continue;
            }

            reservation.complete(None);
            self.repos.reservations().update(reservation.clone()).await?;

            // Free the table, unless it has since been handed to someone else
            if let Some(table) = self
                .repos
                .tables()
                .find_by_id(&reservation.table_id)
                .await?
            {
                if table.current_reservation_id.as_deref() == Some(reservation.id.as_str()) {
                    self.repos
                        .tables()
                        .set_status(&reservation.table_id, TableStatus::Available, None)
                        .await?;
                }
            }

            info!(
                reservation_id = %reservation.id,
                table_number = reservation.table_number,
                "Reservation expired, table released"
            );
            metrics::counter!("reservations_expired_total").increment(1);

            if let Some(bus) = &self.event_bus {
                bus.publish(Event::ReservationExpired(ReservationEvent::from(
                    &reservation,
                )));
            }
            expired += 1;
        }

        Ok(expired)
    }
}

/// Start the periodic expiry sweep.
///
/// Checks every `check_interval_secs` and stops on shutdown.
pub fn start_expiry_task(
    sweeper: Arc<ExpirySweeper>,
    shutdown: ShutdownSignal,
    check_interval_secs: u64,
) {
    tokio::spawn(async move {
        info!(
            check_interval = check_interval_secs,
            "📅 Reservation expiry task started"
        );

        let mut interval = tokio::time::interval(Duration::from_secs(check_interval_secs));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = sweeper.sweep().await {
                        warn!(error = %e, "Expiry sweep error");
                    }
                }
                _ = shutdown.notified().wait() => {
                    info!("📅 Reservation expiry task shutting down");
                    break;
                }
            }
        }

        info!("📅 Reservation expiry task stopped");
    });
}

// ── Tests ──────────────────────────────────────────────────────
