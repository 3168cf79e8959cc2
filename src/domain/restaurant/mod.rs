//! Restaurant aggregate: model and repository interface

pub mod model;
pub mod repository;

pub use model::{parse_hhmm, AdvanceBookingPolicy, DurationRule, Restaurant, Shift};
pub use repository::RestaurantRepository;
