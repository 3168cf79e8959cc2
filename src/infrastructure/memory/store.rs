//! In-memory repositories for development and testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{
    DomainError, DomainResult, IdempotencyRecord, IdempotencyRepository, RepositoryProvider,
    Reservation, ReservationRepository, ReservationStatus, Restaurant, RestaurantRepository,
    Sector, SectorRepository, Table,
};

/// DashMap-backed implementation of every repository trait.
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    restaurants: DashMap<String, Restaurant>,
    sectors: DashMap<String, Sector>,
    tables: DashMap<String, Table>,
    reservations: DashMap<String, Reservation>,
    idempotency: DashMap<String, IdempotencyRecord>,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn restaurants(&self) -> &dyn RestaurantRepository {
        self
    }

    fn sectors(&self) -> &dyn SectorRepository {
        self
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        self
    }

    fn idempotency(&self) -> &dyn IdempotencyRepository {
        self
    }
}

#[async_trait]
impl RestaurantRepository for InMemoryRepositoryProvider {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Restaurant>> {
        Ok(self.restaurants.get(id).map(|r| r.clone()))
    }

    async fn save(&self, restaurant: Restaurant) -> DomainResult<()> {
        restaurant.validate()?;
        self.restaurants.insert(restaurant.id.clone(), restaurant);
        Ok(())
    }
}

#[async_trait]
impl SectorRepository for InMemoryRepositoryProvider {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Sector>> {
        Ok(self.sectors.get(id).map(|s| s.clone()))
    }

    async fn tables_by_sector(&self, sector_id: &str) -> DomainResult<Vec<Table>> {
        let mut tables: Vec<Table> = self
            .tables
            .iter()
            .filter(|t| t.sector_id == sector_id)
            .map(|t| t.clone())
            .collect();
        tables.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(tables)
    }

    async fn table_by_id(&self, id: &str) -> DomainResult<Option<Table>> {
        Ok(self.tables.get(id).map(|t| t.clone()))
    }

    async fn save_sector(&self, sector: Sector) -> DomainResult<()> {
        self.sectors.insert(sector.id.clone(), sector);
        Ok(())
    }

    async fn save_table(&self, table: Table) -> DomainResult<()> {
        table.validate()?;
        self.tables.insert(table.id.clone(), table);
        Ok(())
    }
}

#[async_trait]
impl ReservationRepository for InMemoryRepositoryProvider {
    async fn create(&self, reservation: Reservation) -> DomainResult<()> {
        match self.reservations.entry(reservation.id.clone()) {
            Entry::Occupied(_) => Err(DomainError::Conflict(format!(
                "reservation {} already exists",
                reservation.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(reservation);
                Ok(())
            }
        }
    }

    async fn update(&self, reservation: Reservation) -> DomainResult<()> {
        if !self.reservations.contains_key(&reservation.id) {
            return Err(DomainError::not_found("Reservation", &reservation.id));
        }
        self.reservations
            .insert(reservation.id.clone(), reservation);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        Ok(self.reservations.get(id).map(|r| r.clone()))
    }

    async fn find_by_day(
        &self,
        restaurant_id: &str,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
        sector_id: Option<&str>,
    ) -> DomainResult<Vec<Reservation>> {
        Ok(self
            .reservations
            .iter()
            .filter(|r| {
                r.is_active()
                    && r.restaurant_id == restaurant_id
                    && sector_id.map_or(true, |s| r.sector_id == s)
                    && day_start <= r.start
                    && r.start < day_end
            })
            .map(|r| r.clone())
            .collect())
    }

    async fn find_overlapping(
        &self,
        table_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_id: Option<&str>,
    ) -> DomainResult<Vec<Reservation>> {
        Ok(self
            .reservations
            .iter()
            .filter(|r| {
                exclude_id != Some(r.id.as_str())
                    && r.is_active()
                    && r.overlaps(start, end)
                    && r.shares_any_table(table_ids)
            })
            .map(|r| r.clone())
            .collect())
    }

    async fn find_overlapping_restaurant(
        &self,
        restaurant_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_id: Option<&str>,
    ) -> DomainResult<Vec<Reservation>> {
        Ok(self
            .reservations
            .iter()
            .filter(|r| {
                exclude_id != Some(r.id.as_str())
                    && r.is_active()
                    && r.restaurant_id == restaurant_id
                    && r.overlaps(start, end)
            })
            .map(|r| r.clone())
            .collect())
    }

    async fn find_pending(&self) -> DomainResult<Vec<Reservation>> {
        Ok(self
            .reservations
            .iter()
            .filter(|r| r.status == ReservationStatus::Pending)
            .map(|r| r.clone())
            .collect())
    }
}

#[async_trait]
impl IdempotencyRepository for InMemoryRepositoryProvider {
    async fn get(&self, key: &str) -> DomainResult<Option<IdempotencyRecord>> {
        Ok(self.idempotency.get(key).map(|r| r.clone()))
    }

    async fn put_if_absent(
        &self,
        record: IdempotencyRecord,
    ) -> DomainResult<IdempotencyRecord> {
        match self.idempotency.entry(record.key.clone()) {
            Entry::Occupied(existing) => Ok(existing.get().clone()),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
