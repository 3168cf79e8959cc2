//! SeaORM entity definitions

pub mod dining_table;
pub mod idempotency_key;
pub mod reservation;
pub mod restaurant;
pub mod sector;
