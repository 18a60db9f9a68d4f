//! In-memory repository implementations
//!
//! Backed by `DashMap`; reads and writes are independent calls with no
//! cross-call transaction, mirroring a plain key/document store.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;

use crate::domain::reservation::ReservationRepository;
use crate::domain::table::TableRepository;
use crate::domain::{
    CustomerKey, DomainError, DomainResult, RepositoryProvider, Reservation, Table, TableStatus,
};

/// In-memory table inventory
#[derive(Default)]
pub struct InMemoryTableRepository {
    tables: DashMap<String, Table>,
}

impl InMemoryTableRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TableRepository for InMemoryTableRepository {
    async fn save(&self, table: Table) -> DomainResult<()> {
        // Table numbers are unique within the site
        let duplicate = self
            .tables
            .iter()
            .any(|e| e.value().number == table.number && e.key() != &table.id);
        if duplicate {
            return Err(DomainError::Conflict(format!(
                "Table number {} already exists",
                table.number
            )));
        }
        self.tables.insert(table.id.clone(), table);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Table>> {
        Ok(self.tables.get(id).map(|t| t.clone()))
    }

    async fn find_by_number(&self, number: u32) -> DomainResult<Option<Table>> {
        Ok(self
            .tables
            .iter()
            .find(|t| t.value().number == number)
            .map(|t| t.value().clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Table>> {
        let mut tables: Vec<Table> = self.tables.iter().map(|e| e.value().clone()).collect();
        // Directory order: stable, by table number
        tables.sort_by_key(|t| t.number);
        Ok(tables)
    }

    async fn update(&self, table: Table) -> DomainResult<()> {
        if !self.tables.contains_key(&table.id) {
            return Err(DomainError::not_found("table", "id", table.id.clone()));
        }
        self.tables.insert(table.id.clone(), table);
        Ok(())
    }

    async fn set_status(
        &self,
        id: &str,
        status: TableStatus,
        reservation_id: Option<String>,
    ) -> DomainResult<()> {
        let mut table = self
            .tables
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("table", "id", id))?;
        table.status = status;
        table.current_reservation_id = reservation_id;
        table.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        if let Some(table) = self.tables.get(id) {
            // Never delete a table still holding an active reservation reference
            if let Some(res_id) = &table.current_reservation_id {
                return Err(DomainError::Conflict(format!(
                    "Table {} is held by reservation {}",
                    table.number, res_id
                )));
            }
        }
        self.tables
            .remove(id)
            .ok_or_else(|| DomainError::not_found("table", "id", id))?;
        Ok(())
    }
}

/// In-memory reservation store
#[derive(Default)]
pub struct InMemoryReservationRepository {
    reservations: DashMap<String, Reservation>,
}

impl InMemoryReservationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn save(&self, reservation: Reservation) -> DomainResult<()> {
        self.reservations
            .insert(reservation.id.clone(), reservation);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        Ok(self.reservations.get(id).map(|r| r.clone()))
    }

    async fn find_by_confirmation_code(&self, code: &str) -> DomainResult<Option<Reservation>> {
        Ok(self
            .reservations
            .iter()
            .find(|r| r.value().confirmation_code == code)
            .map(|r| r.value().clone()))
    }

    async fn find_by_date(&self, date: NaiveDate) -> DomainResult<Vec<Reservation>> {
        let mut found: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| r.value().date == date)
            .map(|r| r.value().clone())
            .collect();
        found.sort_by_key(|r| r.time);
        Ok(found)
    }

    async fn find_by_customer(&self, key: &CustomerKey) -> DomainResult<Vec<Reservation>> {
        let mut found: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| key.matches(r.value()))
            .map(|r| r.value().clone())
            .collect();
        found.sort_by_key(|r| (r.date, r.time));
        Ok(found)
    }

    async fn find_active(&self) -> DomainResult<Vec<Reservation>> {
        Ok(self
            .reservations
            .iter()
            .filter(|r| r.value().is_active())
            .map(|r| r.value().clone())
            .collect())
    }

    async fn update(&self, reservation: Reservation) -> DomainResult<()> {
        if !self.reservations.contains_key(&reservation.id) {
            return Err(DomainError::not_found(
                "reservation",
                "id",
                reservation.id.clone(),
            ));
        }
        self.reservations
            .insert(reservation.id.clone(), reservation);
        Ok(())
    }
}

/// Unified in-memory repository provider.
///
/// ```ignore
/// let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
/// let table = repos.tables().find_by_number(12).await?;
/// ```
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    tables: InMemoryTableRepository,
    reservations: InMemoryReservationRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn tables(&self) -> &dyn TableRepository {
        &self.tables
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }
}

// ── Tests ──────────────────────────────────────────────────────
