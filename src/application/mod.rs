//! Use-case orchestration: availability, reservations, locking, policies

pub mod assignment;
pub mod availability;
pub mod expiry;
pub mod idempotency;
pub mod locking;
pub mod reservations;
pub mod scheduling;

pub use availability::{AvailabilityService, DayAvailability, SlotReport};
pub use expiry::ExpirySweeper;
pub use idempotency::{IdempotencyService, StoredResponse};
pub use locking::{SlotLockGuard, SlotLockManager};
pub use reservations::{NewReservation, ReservationPatch, ReservationService};
