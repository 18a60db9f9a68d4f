//! Event-bus backed notification scheduling
//!
//! Publishes a `NotificationQueued` event per scheduled notification and
//! logs it. Actual delivery (SMS, email) is a downstream consumer's job.

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use super::events::{Event, NotificationEvent};
use super::SharedEventBus;
use crate::application::booking::hooks::{NotificationScheduler, ReminderLead};
use crate::domain::{DomainResult, Reservation};

pub struct EventBusNotificationScheduler {
    bus: SharedEventBus,
}

impl EventBusNotificationScheduler {
    pub fn new(bus: SharedEventBus) -> Self {
        Self { bus }
    }

    fn queue(&self, reservation: &Reservation, kind: &str) {
        info!(
            reservation_id = %reservation.id,
            confirmation_code = %reservation.confirmation_code,
            kind,
            "Notification queued"
        );
        self.bus.publish(Event::NotificationQueued(NotificationEvent {
            reservation_id: reservation.id.clone(),
            kind: kind.to_string(),
            timestamp: Utc::now(),
        }));
    }
}

#[async_trait]
impl NotificationScheduler for EventBusNotificationScheduler {
    async fn schedule_confirmation(&self, reservation: &Reservation) -> DomainResult<()> {
        self.queue(reservation, "confirmation");
        Ok(())
    }

    async fn schedule_reminder(
        &self,
        reservation: &Reservation,
        lead: ReminderLead,
    ) -> DomainResult<()> {
        self.queue(reservation, &format!("reminder_{}", lead.as_str()));
        Ok(())
    }

    async fn schedule_cancellation(&self, reservation: &Reservation) -> DomainResult<()> {
        self.queue(reservation, "cancellation");
        Ok(())
    }

    async fn schedule_follow_up(&self, reservation: &Reservation) -> DomainResult<()> {
        self.queue(reservation, "follow_up");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::create_event_bus;

    #[tokio::test]
    async fn scheduling_publishes_notification_event() {
        let bus = create_event_bus();
        let mut subscriber = bus.subscribe();
        let scheduler = EventBusNotificationScheduler::new(bus.clone());

        let table = crate::domain::Table::new(1, 4);
        let reservation = crate::application::booking::testutil::build_reservation(
            &table,
            chrono::NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
            chrono::NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            120,
        );

        scheduler
            .schedule_reminder(&reservation, ReminderLead::H24)
            .await
            .unwrap();

        let received = tokio::time::timeout(
            std::time::Duration::from_millis(100),
            subscriber.recv(),
        )
        .await
        .expect("Timeout")
        .expect("No message");

        match received.event {
            Event::NotificationQueued(e) => assert_eq!(e.kind, "reminder_24h"),
            other => panic!("unexpected event {other:?}"),
        }
    }
}
