//! SeaORM implementation of SectorRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::sector::{Sector, SectorRepository, Table};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{dining_table, sector};

use super::db_err;

pub struct SeaOrmSectorRepository {
    db: DatabaseConnection,
}

impl SeaOrmSectorRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn sector_to_domain(m: sector::Model) -> Sector {
    Sector {
        id: m.id,
        restaurant_id: m.restaurant_id,
        name: m.name,
    }
}

fn table_to_domain(m: dining_table::Model) -> Table {
    Table {
        id: m.id,
        sector_id: m.sector_id,
        min_size: m.min_size.max(0) as u32,
        max_size: m.max_size.max(0) as u32,
    }
}

// ── SectorRepository impl ───────────────────────────────────────

#[async_trait]
impl SectorRepository for SeaOrmSectorRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Sector>> {
        let model = sector::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(sector_to_domain))
    }

    async fn tables_by_sector(&self, sector_id: &str) -> DomainResult<Vec<Table>> {
        let models = dining_table::Entity::find()
            .filter(dining_table::Column::SectorId.eq(sector_id))
            .order_by_asc(dining_table::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(table_to_domain).collect())
    }

    async fn table_by_id(&self, id: &str) -> DomainResult<Option<Table>> {
        let model = dining_table::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(table_to_domain))
    }

    async fn save_sector(&self, s: Sector) -> DomainResult<()> {
        let exists = sector::Entity::find_by_id(&s.id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();

        let model = sector::ActiveModel {
            id: Set(s.id),
            restaurant_id: Set(s.restaurant_id),
            name: Set(s.name),
        };
        if exists {
            model.update(&self.db).await.map_err(db_err)?;
        } else {
            model.insert(&self.db).await.map_err(db_err)?;
        }
        Ok(())
    }

    async fn save_table(&self, t: Table) -> DomainResult<()> {
        t.validate()?;
        let exists = dining_table::Entity::find_by_id(&t.id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();

        let model = dining_table::ActiveModel {
            id: Set(t.id),
            sector_id: Set(t.sector_id),
            min_size: Set(t.min_size as i32),
            max_size: Set(t.max_size as i32),
        };
        if exists {
            model.update(&self.db).await.map_err(db_err)?;
        } else {
            model.insert(&self.db).await.map_err(db_err)?;
        }
        Ok(())
    }
}
