//! SeaORM repository implementations

pub mod idempotency_repository;
pub mod repository_provider;
pub mod reservation_repository;
pub mod restaurant_repository;
pub mod sector_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use crate::domain::DomainError;

/// Store failures are reported to callers as internal errors; they are
/// not retried inside the engine.
pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Internal(format!("database error: {}", e))
}

pub(crate) fn json_err(e: serde_json::Error) -> DomainError {
    DomainError::Internal(format!("corrupt stored json: {}", e))
}
