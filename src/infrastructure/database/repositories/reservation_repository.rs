//! SeaORM implementation of ReservationRepository
//!
//! Interval columns are RFC3339 strings with offset; SQL narrows rows by
//! restaurant/sector/status and the interval comparisons happen on parsed
//! instants in Rust, never on string order.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use tracing::debug;

use crate::domain::reservation::{
    Customer, Reservation, ReservationRepository, ReservationStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::reservation;

use super::{db_err, json_err};

const ACTIVE_STATUSES: [&str; 2] = ["CONFIRMED", "PENDING"];

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Active rows of one restaurant; interval filtering happens on the
    /// parsed instants afterwards.
    async fn active_for_restaurant(
        &self,
        restaurant_id: &str,
    ) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::RestaurantId.eq(restaurant_id))
            .filter(reservation::Column::Status.is_in(ACTIVE_STATUSES))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn parse_instant(s: &str) -> DomainResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::Internal(format!("corrupt stored instant '{}': {}", s, e)))
}

fn model_to_domain(m: reservation::Model) -> DomainResult<Reservation> {
    Ok(Reservation {
        start: parse_instant(&m.start_date_time)?,
        end: parse_instant(&m.end_date_time)?,
        id: m.id,
        restaurant_id: m.restaurant_id,
        sector_id: m.sector_id,
        table_ids: serde_json::from_value(m.table_ids).map_err(json_err)?,
        party_size: m.party_size.max(0) as u32,
        status: ReservationStatus::from_str(&m.status),
        expires_at: m.expires_at,
        customer: Customer {
            name: m.customer_name,
            phone: m.customer_phone,
            email: m.customer_email,
        },
        notes: m.notes,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn domain_to_active(r: &Reservation) -> DomainResult<reservation::ActiveModel> {
    Ok(reservation::ActiveModel {
        id: Set(r.id.clone()),
        restaurant_id: Set(r.restaurant_id.clone()),
        sector_id: Set(r.sector_id.clone()),
        table_ids: Set(serde_json::to_value(&r.table_ids).map_err(json_err)?),
        party_size: Set(r.party_size as i32),
        start_date_time: Set(r.start.to_rfc3339_opts(SecondsFormat::Secs, true)),
        end_date_time: Set(r.end.to_rfc3339_opts(SecondsFormat::Secs, true)),
        status: Set(r.status.as_str().to_string()),
        expires_at: Set(r.expires_at),
        customer_name: Set(r.customer.name.clone()),
        customer_phone: Set(r.customer.phone.clone()),
        customer_email: Set(r.customer.email.clone()),
        notes: Set(r.notes.clone()),
        created_at: Set(r.created_at),
        updated_at: Set(r.updated_at),
    })
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn create(&self, r: Reservation) -> DomainResult<()> {
        debug!(reservation_id = %r.id, "inserting reservation");
        domain_to_active(&r)?.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn update(&self, r: Reservation) -> DomainResult<()> {
        let exists = reservation::Entity::find_by_id(&r.id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            return Err(DomainError::not_found("Reservation", &r.id));
        }
        domain_to_active(&r)?.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_by_day(
        &self,
        restaurant_id: &str,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
        sector_id: Option<&str>,
    ) -> DomainResult<Vec<Reservation>> {
        let mut query = reservation::Entity::find()
            .filter(reservation::Column::RestaurantId.eq(restaurant_id))
            .filter(reservation::Column::Status.is_in(ACTIVE_STATUSES));
        if let Some(sector_id) = sector_id {
            query = query.filter(reservation::Column::SectorId.eq(sector_id));
        }
        let models = query.all(&self.db).await.map_err(db_err)?;

        let mut reservations = Vec::with_capacity(models.len());
        for model in models {
            let r = model_to_domain(model)?;
            if day_start <= r.start && r.start < day_end {
                reservations.push(r);
            }
        }
        Ok(reservations)
    }

    async fn find_overlapping(
        &self,
        table_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_id: Option<&str>,
    ) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::Status.is_in(ACTIVE_STATUSES))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut hits = Vec::new();
        for model in models {
            let r = model_to_domain(model)?;
            if exclude_id != Some(r.id.as_str())
                && r.overlaps(start, end)
                && r.shares_any_table(table_ids)
            {
                hits.push(r);
            }
        }
        Ok(hits)
    }

    async fn find_overlapping_restaurant(
        &self,
        restaurant_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_id: Option<&str>,
    ) -> DomainResult<Vec<Reservation>> {
        Ok(self
            .active_for_restaurant(restaurant_id)
            .await?
            .into_iter()
            .filter(|r| exclude_id != Some(r.id.as_str()) && r.overlaps(start, end))
            .collect())
    }

    async fn find_pending(&self) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::Status.eq(ReservationStatus::Pending.as_str()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }
}
