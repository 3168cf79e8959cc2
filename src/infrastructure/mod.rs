//! External concerns: persistence backends and the lock store

pub mod database;
pub mod memory;

pub use database::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};
pub use memory::{InMemoryLockStore, InMemoryRepositoryProvider};
