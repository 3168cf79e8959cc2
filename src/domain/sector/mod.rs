//! Sector aggregate: sectors, tables and their repository interface

pub mod model;
pub mod repository;

pub use model::{Sector, Table};
pub use repository::SectorRepository;
