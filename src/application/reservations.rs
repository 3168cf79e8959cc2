//! Reservation lifecycle orchestration
//!
//! Write path of the engine. Every mutation follows the same discipline:
//! validate against configuration, take restaurant-level slot locks (only
//! when a guest cap exists) then sector-level slot locks, run exactly one
//! overlap query plus an in-memory assignment inside the critical section,
//! persist, and release the locks on every exit path in LIFO order.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use crate::application::locking::{SlotLockGuard, SlotLockManager};
use crate::application::{assignment, scheduling};
use crate::config::BookingConfig;
use crate::domain::{
    Customer, DomainError, DomainResult, RepositoryProvider, Reservation, ReservationStatus,
    Restaurant, Sector,
};

/// Input for creating a reservation
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub restaurant_id: String,
    pub sector_id: String,
    pub party_size: u32,
    pub start: DateTime<Utc>,
    pub customer: Customer,
    pub notes: Option<String>,
}

/// Partial update; unset fields keep their current value
#[derive(Debug, Clone, Default)]
pub struct ReservationPatch {
    pub sector_id: Option<String>,
    pub party_size: Option<u32>,
    pub start: Option<DateTime<Utc>>,
    pub customer: Option<Customer>,
    pub notes: Option<String>,
}

/// Orchestrates create / update / cancel / approve / reject / expire.
pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
    locks: Arc<SlotLockManager>,
    booking: BookingConfig,
}

impl ReservationService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        locks: Arc<SlotLockManager>,
        booking: BookingConfig,
    ) -> Self {
        Self {
            repos,
            locks,
            booking,
        }
    }

    fn check_party_size(&self, party_size: u32) -> DomainResult<()> {
        if party_size == 0 || party_size > self.booking.max_party_size {
            return Err(DomainError::InvalidFormat(format!(
                "party size must be between 1 and {}",
                self.booking.max_party_size
            )));
        }
        Ok(())
    }

    async fn restaurant(&self, id: &str) -> DomainResult<Restaurant> {
        self.repos
            .restaurants()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Restaurant", id))
    }

    async fn sector_of(&self, restaurant: &Restaurant, sector_id: &str) -> DomainResult<Sector> {
        self.repos
            .sectors()
            .find_by_id(sector_id)
            .await?
            .filter(|s| s.restaurant_id == restaurant.id)
            .ok_or_else(|| DomainError::not_found("Sector", sector_id))
    }

    /// Validate that `start` is bookable at all: slot-aligned and inside a
    /// service shift.
    fn check_start(restaurant: &Restaurant, start: DateTime<Utc>) -> DomainResult<()> {
        let tz = restaurant.tz()?;
        if !scheduling::is_slot_aligned(start) {
            return Err(DomainError::InvalidFormat(
                "start must lie on the 15-minute slot grid".into(),
            ));
        }
        if !scheduling::within_shift(start, tz, &restaurant.shifts) {
            return Err(DomainError::OutsideServiceWindow(format!(
                "start {} is not inside any service shift",
                start.to_rfc3339()
            )));
        }
        Ok(())
    }

    /// Reservations do not span shifts: the shift containing `start` must
    /// also contain the end of the stay.
    fn check_fits(
        restaurant: &Restaurant,
        start: DateTime<Utc>,
        duration_minutes: i64,
    ) -> DomainResult<()> {
        let tz = restaurant.tz()?;
        if !scheduling::fits_in_shift(start, duration_minutes, tz, &restaurant.shifts) {
            return Err(DomainError::OutsideServiceWindow(format!(
                "a {}-minute reservation starting at {} does not end within its shift",
                duration_minutes,
                start.to_rfc3339()
            )));
        }
        Ok(())
    }

    /// Take restaurant-level locks (guest cap only) then sector-level
    /// locks, releasing the former when the latter fail.
    async fn lock_interval(
        &self,
        restaurant: &Restaurant,
        sector_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<(Option<SlotLockGuard>, SlotLockGuard)> {
        let restaurant_guard = if restaurant.max_guests_per_slot.is_some() {
            Some(self.locks.lock_restaurant(&restaurant.id, start, end).await?)
        } else {
            None
        };
        match self.locks.lock_sector(sector_id, start, end).await {
            Ok(sector_guard) => Ok((restaurant_guard, sector_guard)),
            Err(e) => {
                if let Some(guard) = restaurant_guard {
                    guard.release().await;
                }
                Err(e)
            }
        }
    }

    /// Enforce the restaurant-wide guest cap per 15-minute slot: for every
    /// slot the new party would occupy, the active guests already seated
    /// during that slot plus the party must stay within the cap.
    async fn check_guest_cap(
        &self,
        restaurant: &Restaurant,
        party_size: u32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_id: Option<&str>,
    ) -> DomainResult<()> {
        let Some(cap) = restaurant.max_guests_per_slot else {
            return Ok(());
        };
        let overlapping = self
            .repos
            .reservations()
            .find_overlapping_restaurant(&restaurant.id, start, end, exclude_id)
            .await?;
        let peak: u32 = scheduling::slot_instants(start, end)
            .iter()
            .map(|slot| {
                overlapping
                    .iter()
                    .filter(|r| r.start <= *slot && *slot < r.end)
                    .map(|r| r.party_size)
                    .sum()
            })
            .max()
            .unwrap_or(0);
        if peak + party_size > cap {
            return Err(DomainError::NoCapacity(format!(
                "guest capacity of {} reached",
                cap
            )));
        }
        Ok(())
    }

    /// One overlap query for the sector, then the in-memory assignment.
    async fn assign_tables(
        &self,
        sector_id: &str,
        party_size: u32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_id: Option<&str>,
    ) -> DomainResult<Vec<String>> {
        let tables = self.repos.sectors().tables_by_sector(sector_id).await?;
        let all_ids: Vec<String> = tables.iter().map(|t| t.id.clone()).collect();
        let existing = self
            .repos
            .reservations()
            .find_overlapping(&all_ids, start, end, exclude_id)
            .await?;
        assignment::find_tables(
            &tables,
            party_size,
            start,
            end,
            &existing,
            exclude_id,
            self.booking.max_combination_tables,
        )
        .ok_or_else(|| {
            DomainError::NoCapacity("no table or combination available for this slot".into())
        })
    }

    // ── Create ─────────────────────────────────────────────────

    pub async fn create(&self, req: NewReservation) -> DomainResult<Reservation> {
        self.check_party_size(req.party_size)?;
        let restaurant = self.restaurant(&req.restaurant_id).await?;
        let sector = self.sector_of(&restaurant, &req.sector_id).await?;

        Self::check_start(&restaurant, req.start)?;
        let now = Utc::now();
        restaurant.check_advance(req.start, now, self.booking.allow_past_start)?;

        let duration_minutes = restaurant.duration_minutes_for(req.party_size);
        Self::check_fits(&restaurant, req.start, duration_minutes)?;
        let end = req.start + Duration::minutes(duration_minutes);

        let (restaurant_guard, sector_guard) = self
            .lock_interval(&restaurant, &sector.id, req.start, end)
            .await?;

        let result = self.create_locked(&restaurant, &sector, &req, end, now).await;

        sector_guard.release().await;
        if let Some(guard) = restaurant_guard {
            guard.release().await;
        }
        result
    }

    async fn create_locked(
        &self,
        restaurant: &Restaurant,
        sector: &Sector,
        req: &NewReservation,
        end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> DomainResult<Reservation> {
        // Sweep stale holds first so they neither inflate the guest cap
        // nor block assignment
        self.expire_pending().await?;

        self.check_guest_cap(restaurant, req.party_size, req.start, end, None)
            .await?;

        let table_ids = self
            .assign_tables(&sector.id, req.party_size, req.start, end, None)
            .await?;

        let (status, expires_at) = match (
            restaurant.large_group_threshold,
            restaurant.pending_hold_ttl_minutes,
        ) {
            (Some(threshold), Some(ttl)) if req.party_size >= threshold => (
                ReservationStatus::Pending,
                Some(now + Duration::minutes(ttl)),
            ),
            _ => (ReservationStatus::Confirmed, None),
        };

        let reservation = Reservation {
            id: Uuid::new_v4().to_string(),
            restaurant_id: restaurant.id.clone(),
            sector_id: sector.id.clone(),
            table_ids,
            party_size: req.party_size,
            start: req.start,
            end,
            status,
            expires_at,
            customer: req.customer.clone(),
            notes: req.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        self.repos.reservations().create(reservation.clone()).await?;

        info!(
            reservation_id = %reservation.id,
            sector_id = %sector.id,
            party_size = reservation.party_size,
            status = %reservation.status,
            "Reservation created"
        );
        Ok(reservation)
    }

    // ── Update ─────────────────────────────────────────────────

    pub async fn update(&self, id: &str, patch: ReservationPatch) -> DomainResult<Reservation> {
        let current = self
            .repos
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", id))?;
        if current.status == ReservationStatus::Cancelled {
            return Err(DomainError::InvalidFormat(
                "a cancelled reservation cannot be updated".into(),
            ));
        }

        let restaurant = self.restaurant(&current.restaurant_id).await?;
        let sector_id = patch.sector_id.clone().unwrap_or_else(|| current.sector_id.clone());
        let sector = self.sector_of(&restaurant, &sector_id).await?;

        let party_size = patch.party_size.unwrap_or(current.party_size);
        self.check_party_size(party_size)?;
        let start = patch.start.unwrap_or(current.start);

        let now = Utc::now();
        let time_changed = start != current.start;
        if time_changed {
            Self::check_start(&restaurant, start)?;
            restaurant.check_advance(start, now, self.booking.allow_past_start)?;
        }

        let duration_minutes = restaurant.duration_minutes_for(party_size);
        let end = start + Duration::minutes(duration_minutes);
        let interval_changed = time_changed || end != current.end;
        if interval_changed {
            Self::check_fits(&restaurant, start, duration_minutes)?;
        }
        let needs_reassign = interval_changed
            || sector.id != current.sector_id
            || party_size != current.party_size;

        let (restaurant_guard, sector_guard) =
            self.lock_interval(&restaurant, &sector.id, start, end).await?;

        let result = self
            .update_locked(
                &restaurant, &sector, &current, party_size, start, end, needs_reassign, patch,
                now,
            )
            .await;

        sector_guard.release().await;
        if let Some(guard) = restaurant_guard {
            guard.release().await;
        }
        result
    }

    #[allow(clippy::too_many_arguments)]
    async fn update_locked(
        &self,
        restaurant: &Restaurant,
        sector: &Sector,
        current: &Reservation,
        party_size: u32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        needs_reassign: bool,
        patch: ReservationPatch,
        now: DateTime<Utc>,
    ) -> DomainResult<Reservation> {
        self.expire_pending().await?;

        // The reservation itself is excluded from the cap sum, so only the
        // delta the new party adds is checked
        self.check_guest_cap(restaurant, party_size, start, end, Some(&current.id))
            .await?;

        let table_ids = if needs_reassign {
            self.assign_tables(&sector.id, party_size, start, end, Some(&current.id))
                .await?
        } else {
            current.table_ids.clone()
        };

        let updated = Reservation {
            id: current.id.clone(),
            restaurant_id: current.restaurant_id.clone(),
            sector_id: sector.id.clone(),
            table_ids,
            party_size,
            start,
            end,
            status: current.status,
            expires_at: current.expires_at,
            customer: patch.customer.unwrap_or_else(|| current.customer.clone()),
            notes: patch.notes.or_else(|| current.notes.clone()),
            created_at: current.created_at,
            updated_at: now,
        };
        self.repos.reservations().update(updated.clone()).await?;

        info!(reservation_id = %updated.id, "Reservation updated");
        Ok(updated)
    }

    // ── Cancel ─────────────────────────────────────────────────

    /// Idempotent: cancelling a cancelled reservation is a no-op.
    pub async fn cancel(&self, id: &str) -> DomainResult<()> {
        let mut reservation = self
            .repos
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", id))?;
        if reservation.status == ReservationStatus::Cancelled {
            return Ok(());
        }
        reservation.cancel(Utc::now());
        self.repos.reservations().update(reservation).await?;
        info!(reservation_id = %id, "Reservation cancelled");
        Ok(())
    }

    // ── Approve / Reject ───────────────────────────────────────

    pub async fn approve(&self, id: &str) -> DomainResult<Reservation> {
        let mut reservation = self
            .repos
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", id))?;
        if reservation.status != ReservationStatus::Pending {
            return Err(DomainError::InvalidFormat(
                "only a pending reservation can be approved".into(),
            ));
        }
        let now = Utc::now();
        if reservation.is_hold_expired(now) {
            return Err(DomainError::Conflict("the pending hold has expired".into()));
        }
        reservation.approve(now);
        self.repos.reservations().update(reservation.clone()).await?;
        info!(reservation_id = %id, "Pending hold approved");
        Ok(reservation)
    }

    pub async fn reject(&self, id: &str) -> DomainResult<Reservation> {
        let mut reservation = self
            .repos
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", id))?;
        if reservation.status != ReservationStatus::Pending {
            return Err(DomainError::InvalidFormat(
                "only a pending reservation can be rejected".into(),
            ));
        }
        reservation.cancel(Utc::now());
        self.repos.reservations().update(reservation.clone()).await?;
        info!(reservation_id = %id, "Pending hold rejected");
        Ok(reservation)
    }

    // ── Expire ─────────────────────────────────────────────────

    /// Cancel every pending hold whose TTL elapsed. Runs on demand and
    /// opportunistically before each write.
    pub async fn expire_pending(&self) -> DomainResult<usize> {
        let pending = self.repos.reservations().find_pending().await?;
        let now = Utc::now();
        let mut expired = 0;
        for mut reservation in pending {
            if reservation.is_hold_expired(now) {
                reservation.cancel(now);
                self.repos.reservations().update(reservation).await?;
                expired += 1;
            }
        }
        if expired > 0 {
            info!(count = expired, "Expired overdue pending holds");
        }
        Ok(expired)
    }

    // ── Day view ───────────────────────────────────────────────

    /// Active reservations whose start lies in the restaurant's local day.
    pub async fn day_view(
        &self,
        restaurant_id: &str,
        date: NaiveDate,
        sector_id: Option<&str>,
    ) -> DomainResult<Vec<Reservation>> {
        let restaurant = self.restaurant(restaurant_id).await?;
        let tz = restaurant.tz()?;
        if let Some(sector_id) = sector_id {
            self.sector_of(&restaurant, sector_id).await?;
        }
        let (day_start, _) = scheduling::day_bounds(date, tz);
        let mut items = self
            .repos
            .reservations()
            .find_by_day(
                &restaurant.id,
                day_start,
                day_start + Duration::hours(24),
                sector_id,
            )
            .await?;
        items.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }
}

// ── Tests ──────────────────────────────────────────────────────
