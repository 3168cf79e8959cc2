//! Reservation aggregate: model and repository interface

pub mod model;
pub mod repository;

pub use model::{Customer, Reservation, ReservationStatus};
pub use repository::ReservationRepository;
