//! Availability endpoint

pub mod dto;
pub mod handlers;

pub use handlers::AvailabilityAppState;
