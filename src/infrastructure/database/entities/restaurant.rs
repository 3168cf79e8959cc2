//! Restaurant entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "restaurants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    /// IANA timezone name
    pub timezone: String,

    /// JSON array of `{start, end}` local-time shifts
    pub shifts: Json,

    pub default_duration_minutes: i64,

    /// JSON array of `{max_party_size, duration_minutes}` rules
    pub duration_rules: Json,

    /// JSON `{min_advance_minutes?, max_advance_days?}`
    #[sea_orm(nullable)]
    pub advance_policy: Option<Json>,

    #[sea_orm(nullable)]
    pub large_group_threshold: Option<i32>,

    #[sea_orm(nullable)]
    pub pending_hold_ttl_minutes: Option<i64>,

    #[sea_orm(nullable)]
    pub max_guests_per_slot: Option<i32>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sector::Entity")]
    Sectors,
}

impl Related<super::sector::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sectors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
