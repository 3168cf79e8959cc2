//! Idempotency records: model and repository interface

pub mod model;
pub mod repository;

pub use model::IdempotencyRecord;
pub use repository::IdempotencyRepository;
