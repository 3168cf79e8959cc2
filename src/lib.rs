//! # Reserva
//!
//! Reservation engine for a restaurant booking service: timezone-correct
//! availability over 15-minute slots, Best-Fit table assignment with a
//! bounded combination search, a confirmed/pending/cancelled lifecycle
//! with TTL holds, per-slot distributed locking and idempotent writes.
//!
//! ## Architecture
//!
//! - **domain**: entities, repository traits, the lock-store trait and
//!   the error taxonomy
//! - **application**: use-case orchestration (availability, reservations,
//!   assignment, locking, idempotency, expiry sweep)
//! - **infrastructure**: persistence backends (SeaORM, in-memory) and the
//!   in-memory lock store
//! - **interfaces**: HTTP delivery (axum)
//! - **config**: TOML-based application configuration

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;

// Re-export commonly used types at crate root
pub use application::{
    AvailabilityService, IdempotencyService, NewReservation, ReservationPatch,
    ReservationService, SlotLockManager,
};
pub use config::{default_config_path, AppConfig};
pub use infrastructure::{
    init_database, DatabaseConfig, InMemoryLockStore, InMemoryRepositoryProvider,
    SeaOrmRepositoryProvider,
};
pub use interfaces::http::create_api_router;
