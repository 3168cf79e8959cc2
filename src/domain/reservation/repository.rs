//! Reservation repository interface
//!
//! The store is the source of truth but does not serialize competing
//! writers; that is the lock manager's job. Interval comparisons are
//! always made on parsed absolute instants.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::Reservation;
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Persist a new reservation
    async fn create(&self, reservation: Reservation) -> DomainResult<()>;

    /// Replace an existing reservation
    async fn update(&self, reservation: Reservation) -> DomainResult<()>;

    /// Find reservation by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>>;

    /// Active (`CONFIRMED`/`PENDING`) reservations whose `start` lies in
    /// `[day_start, day_end)`, optionally narrowed to one sector.
    async fn find_by_day(
        &self,
        restaurant_id: &str,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
        sector_id: Option<&str>,
    ) -> DomainResult<Vec<Reservation>>;

    /// Active reservations strictly overlapping `[start, end)` that occupy
    /// any of the given tables. `exclude_id` drops one reservation from
    /// the result (self-overlap on update).
    async fn find_overlapping(
        &self,
        table_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_id: Option<&str>,
    ) -> DomainResult<Vec<Reservation>>;

    /// Active reservations of a restaurant strictly overlapping
    /// `[start, end)`; used for guest-cap enforcement.
    async fn find_overlapping_restaurant(
        &self,
        restaurant_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_id: Option<&str>,
    ) -> DomainResult<Vec<Reservation>>;

    /// All `PENDING` reservations (TTL sweep)
    async fn find_pending(&self) -> DomainResult<Vec<Reservation>>;
}
