//! SeaORM implementation of RestaurantRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::domain::restaurant::{Restaurant, RestaurantRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::restaurant;

use super::{db_err, json_err};

pub struct SeaOrmRestaurantRepository {
    db: DatabaseConnection,
}

impl SeaOrmRestaurantRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: restaurant::Model) -> DomainResult<Restaurant> {
    Ok(Restaurant {
        id: m.id,
        name: m.name,
        timezone: m.timezone,
        shifts: serde_json::from_value(m.shifts).map_err(json_err)?,
        default_duration_minutes: m.default_duration_minutes,
        duration_rules: serde_json::from_value(m.duration_rules).map_err(json_err)?,
        advance_policy: m
            .advance_policy
            .map(serde_json::from_value)
            .transpose()
            .map_err(json_err)?,
        large_group_threshold: m.large_group_threshold.map(|v| v as u32),
        pending_hold_ttl_minutes: m.pending_hold_ttl_minutes,
        max_guests_per_slot: m.max_guests_per_slot.map(|v| v as u32),
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn domain_to_active(r: &Restaurant) -> DomainResult<restaurant::ActiveModel> {
    Ok(restaurant::ActiveModel {
        id: Set(r.id.clone()),
        name: Set(r.name.clone()),
        timezone: Set(r.timezone.clone()),
        shifts: Set(serde_json::to_value(&r.shifts).map_err(json_err)?),
        default_duration_minutes: Set(r.default_duration_minutes),
        duration_rules: Set(serde_json::to_value(&r.duration_rules).map_err(json_err)?),
        advance_policy: Set(r
            .advance_policy
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(json_err)?),
        large_group_threshold: Set(r.large_group_threshold.map(|v| v as i32)),
        pending_hold_ttl_minutes: Set(r.pending_hold_ttl_minutes),
        max_guests_per_slot: Set(r.max_guests_per_slot.map(|v| v as i32)),
        created_at: Set(r.created_at),
        updated_at: Set(r.updated_at),
    })
}

// ── RestaurantRepository impl ───────────────────────────────────

#[async_trait]
impl RestaurantRepository for SeaOrmRestaurantRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Restaurant>> {
        let model = restaurant::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn save(&self, r: Restaurant) -> DomainResult<()> {
        r.validate()?;
        let exists = restaurant::Entity::find_by_id(&r.id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();

        let model = domain_to_active(&r)?;
        if exists {
            model.update(&self.db).await.map_err(db_err)?;
        } else {
            model.insert(&self.db).await.map_err(db_err)?;
        }
        Ok(())
    }
}
