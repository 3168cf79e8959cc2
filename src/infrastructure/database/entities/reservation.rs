//! Reservation entity
//!
//! `start_date_time`/`end_date_time` are stored as full RFC3339 strings
//! with offset for human readability; interval comparisons always go
//! through parsed absolute instants, never string order.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub restaurant_id: String,
    pub sector_id: String,

    /// JSON array of table ids (ordered)
    pub table_ids: Json,

    pub party_size: i32,

    pub start_date_time: String,
    pub end_date_time: String,

    /// CONFIRMED, PENDING or CANCELLED
    pub status: String,

    #[sea_orm(nullable)]
    pub expires_at: Option<DateTimeUtc>,

    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,

    #[sea_orm(nullable)]
    pub notes: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::restaurant::Entity",
        from = "Column::RestaurantId",
        to = "super::restaurant::Column::Id"
    )]
    Restaurant,
    #[sea_orm(
        belongs_to = "super::sector::Entity",
        from = "Column::SectorId",
        to = "super::sector::Column::Id"
    )]
    Sector,
}

impl Related<super::restaurant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurant.def()
    }
}

impl Related<super::sector::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sector.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
