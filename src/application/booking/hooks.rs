//! Side-effect hooks fired by the lifecycle service
//!
//! Both collaborators are best-effort: the lifecycle service logs their
//! failures and never lets them fail the triggering operation.

use async_trait::async_trait;
use tracing::info;

use crate::domain::{CustomerKey, DomainResult, Reservation};

/// How far ahead of the visit a reminder goes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderLead {
    H24,
    H2,
}

impl ReminderLead {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::H24 => "24h",
            Self::H2 => "2h",
        }
    }
}

/// Schedules customer-facing notifications. Delivery mechanics live
/// outside this service; this is only the scheduling hook.
#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    async fn schedule_confirmation(&self, reservation: &Reservation) -> DomainResult<()>;

    async fn schedule_reminder(
        &self,
        reservation: &Reservation,
        lead: ReminderLead,
    ) -> DomainResult<()>;

    async fn schedule_cancellation(&self, reservation: &Reservation) -> DomainResult<()>;

    async fn schedule_follow_up(&self, reservation: &Reservation) -> DomainResult<()>;
}

/// Aggregates per-customer visit statistics on completion.
#[async_trait]
pub trait CustomerStatsUpdater: Send + Sync {
    async fn record_completed_visit(
        &self,
        customer: &CustomerKey,
        spend: Option<f64>,
    ) -> DomainResult<()>;
}

/// Stats sink that only logs the visit.
pub struct LoggingCustomerStats;

#[async_trait]
impl CustomerStatsUpdater for LoggingCustomerStats {
    async fn record_completed_visit(
        &self,
        customer: &CustomerKey,
        spend: Option<f64>,
    ) -> DomainResult<()> {
        info!(
            customer_id = customer.customer_id.as_deref().unwrap_or("-"),
            phone = customer.phone.as_deref().unwrap_or("-"),
            spend = spend.unwrap_or(0.0),
            "Completed visit recorded"
        );
        Ok(())
    }
}
