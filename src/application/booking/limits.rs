//! Per-customer booking limits
//!
//! Guards the allocator from abuse. All three rules run before any
//! allocation is attempted, so a rejected request touches no table state.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use super::clock;
use crate::config::BookingPolicy;
use crate::domain::{CustomerKey, DomainError, DomainResult, RepositoryProvider};

pub struct BookingLimitGuard {
    repos: Arc<dyn RepositoryProvider>,
    max_active: usize,
    max_active_per_day: usize,
}

impl BookingLimitGuard {
    pub fn new(repos: Arc<dyn RepositoryProvider>, policy: &BookingPolicy) -> Self {
        Self {
            repos,
            max_active: policy.max_active_reservations,
            max_active_per_day: policy.max_active_per_day,
        }
    }

    /// Check a new request for `date`+`time` against the customer's
    /// currently non-terminal, not-yet-ended reservations.
    ///
    /// The reservation being updated (if any) is excluded so editing an
    /// existing booking does not trip over itself.
    pub async fn check(
        &self,
        customer: &CustomerKey,
        date: NaiveDate,
        time: NaiveTime,
        exclude_reservation_id: Option<&str>,
    ) -> DomainResult<()> {
        if customer.is_empty() {
            return Ok(());
        }

        let now = clock::now();
        let existing = self.repos.reservations().find_by_customer(customer).await?;
        let active: Vec<_> = existing
            .iter()
            .filter(|r| exclude_reservation_id != Some(r.id.as_str()))
            .filter(|r| r.is_active() && !r.has_ended(now))
            .collect();

        if active.len() >= self.max_active {
            return Err(DomainError::LimitExceeded(format!(
                "customer already has {} active reservations",
                active.len()
            )));
        }

        let same_day = active.iter().filter(|r| r.date == date).count();
        if same_day >= self.max_active_per_day {
            return Err(DomainError::LimitExceeded(format!(
                "customer already has a reservation on {}",
                date
            )));
        }

        if active.iter().any(|r| r.date == date && r.time == time) {
            return Err(DomainError::LimitExceeded(format!(
                "duplicate reservation for {} at {}",
                date,
                time.format("%H:%M")
            )));
        }

        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::booking::testutil::{
        build_reservation, future_date, repos, table, time,
    };
    use crate::domain::ReservationStatus;

    fn key(phone: &str) -> CustomerKey {
        CustomerKey {
            customer_id: None,
            phone: Some(phone.to_string()),
        }
    }

    async fn booked(
        repos: &Arc<dyn RepositoryProvider>,
        table: &crate::domain::Table,
        phone: &str,
        days_ahead: i64,
        at: NaiveTime,
    ) -> crate::domain::Reservation {
        let mut r = build_reservation(table, future_date(days_ahead), at, 120);
        r.contact.as_mut().unwrap().phone = phone.to_string();
        repos.reservations().save(r.clone()).await.unwrap();
        r
    }

    fn guard(repos: &Arc<dyn RepositoryProvider>) -> BookingLimitGuard {
        BookingLimitGuard::new(repos.clone(), &BookingPolicy::default())
    }

    #[tokio::test]
    async fn two_active_reservations_block_a_third() {
        let repos = repos();
        let t = table(&repos, 1, 4).await;
        booked(&repos, &t, "+111", 1, time(18, 0)).await;
        booked(&repos, &t, "+111", 2, time(18, 0)).await;

        let result = guard(&repos)
            .check(&key("+111"), future_date(3), time(18, 0), None)
            .await;
        assert!(matches!(result, Err(DomainError::LimitExceeded(_))));
    }

    #[tokio::test]
    async fn one_reservation_on_the_same_date_blocks() {
        let repos = repos();
        let t = table(&repos, 1, 4).await;
        booked(&repos, &t, "+111", 1, time(12, 0)).await;

        let result = guard(&repos)
            .check(&key("+111"), future_date(1), time(19, 0), None)
            .await;
        assert!(matches!(result, Err(DomainError::LimitExceeded(_))));

        // a different date is fine
        guard(&repos)
            .check(&key("+111"), future_date(2), time(19, 0), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn terminal_reservations_do_not_count() {
        let repos = repos();
        let t = table(&repos, 1, 4).await;

        let mut r1 = booked(&repos, &t, "+111", 1, time(12, 0)).await;
        r1.cancel(None);
        repos.reservations().update(r1).await.unwrap();

        let mut r2 = booked(&repos, &t, "+111", 2, time(12, 0)).await;
        r2.status = ReservationStatus::Completed;
        repos.reservations().update(r2).await.unwrap();

        guard(&repos)
            .check(&key("+111"), future_date(1), time(19, 0), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn other_customers_are_not_affected() {
        let repos = repos();
        let t = table(&repos, 1, 4).await;
        booked(&repos, &t, "+111", 1, time(12, 0)).await;
        booked(&repos, &t, "+111", 2, time(12, 0)).await;

        guard(&repos)
            .check(&key("+222"), future_date(1), time(19, 0), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn excluded_reservation_is_ignored() {
        let repos = repos();
        let t = table(&repos, 1, 4).await;
        let r = booked(&repos, &t, "+111", 1, time(12, 0)).await;

        // Editing r itself: its own slot must not trip the same-date rule
        guard(&repos)
            .check(&key("+111"), future_date(1), time(13, 0), Some(r.id.as_str()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn anonymous_requests_pass() {
        let repos = repos();
        guard(&repos)
            .check(&CustomerKey::default(), future_date(1), time(19, 0), None)
            .await
            .unwrap();
    }
}
