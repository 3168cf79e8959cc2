//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::idempotency::IdempotencyRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::reservation::ReservationRepository;
use crate::domain::restaurant::RestaurantRepository;
use crate::domain::sector::SectorRepository;

use super::idempotency_repository::SeaOrmIdempotencyRepository;
use super::reservation_repository::SeaOrmReservationRepository;
use super::restaurant_repository::SeaOrmRestaurantRepository;
use super::sector_repository::SeaOrmSectorRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository
/// accessors.
pub struct SeaOrmRepositoryProvider {
    restaurants: SeaOrmRestaurantRepository,
    sectors: SeaOrmSectorRepository,
    reservations: SeaOrmReservationRepository,
    idempotency: SeaOrmIdempotencyRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            restaurants: SeaOrmRestaurantRepository::new(db.clone()),
            sectors: SeaOrmSectorRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db.clone()),
            idempotency: SeaOrmIdempotencyRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn restaurants(&self) -> &dyn RestaurantRepository {
        &self.restaurants
    }

    fn sectors(&self) -> &dyn SectorRepository {
        &self.sectors
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn idempotency(&self) -> &dyn IdempotencyRepository {
        &self.idempotency
    }
}
