//! Sector and table repository interface

use async_trait::async_trait;

use super::model::{Sector, Table};
use crate::domain::DomainResult;

#[async_trait]
pub trait SectorRepository: Send + Sync {
    /// Find sector by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Sector>>;

    /// All tables belonging to a sector
    async fn tables_by_sector(&self, sector_id: &str) -> DomainResult<Vec<Table>>;

    /// Find a single table by ID
    async fn table_by_id(&self, id: &str) -> DomainResult<Option<Table>>;

    /// Insert or replace a sector (seeding / admin tooling)
    async fn save_sector(&self, sector: Sector) -> DomainResult<()>;

    /// Insert or replace a table (seeding / admin tooling)
    async fn save_table(&self, table: Table) -> DomainResult<()>;
}
