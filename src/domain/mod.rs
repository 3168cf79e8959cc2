//! Core business entities, repository traits and value objects

pub mod error;
pub mod idempotency;
pub mod lock;
pub mod repositories;
pub mod reservation;
pub mod restaurant;
pub mod sector;

// Re-export commonly used types
pub use error::{DomainError, DomainResult};
pub use idempotency::{IdempotencyRecord, IdempotencyRepository};
pub use lock::LockStore;
pub use repositories::RepositoryProvider;
pub use reservation::{Customer, Reservation, ReservationRepository, ReservationStatus};
pub use restaurant::{
    AdvanceBookingPolicy, DurationRule, Restaurant, RestaurantRepository, Shift,
};
pub use sector::{Sector, SectorRepository, Table};
