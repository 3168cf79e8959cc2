//! Repository provider for the domain layer
//!
//! Unified access to all per-aggregate repositories. Consumers request
//! only the repository they need:
//!
//! ```ignore
//! async fn handle(repos: &dyn RepositoryProvider) {
//!     let restaurant = repos.restaurants().find_by_id("r1").await?;
//!     let tables = repos.sectors().tables_by_sector("s1").await?;
//! }
//! ```

use super::idempotency::IdempotencyRepository;
use super::reservation::ReservationRepository;
use super::restaurant::RestaurantRepository;
use super::sector::SectorRepository;

/// Provides access to all domain repositories.
pub trait RepositoryProvider: Send + Sync {
    fn restaurants(&self) -> &dyn RestaurantRepository;
    fn sectors(&self) -> &dyn SectorRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
    fn idempotency(&self) -> &dyn IdempotencyRepository;
}
