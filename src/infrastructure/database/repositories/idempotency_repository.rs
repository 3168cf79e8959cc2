//! SeaORM implementation of IdempotencyRepository

use async_trait::async_trait;
use sea_orm::error::SqlErr;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::domain::idempotency::{IdempotencyRecord, IdempotencyRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::idempotency_key;

use super::db_err;

pub struct SeaOrmIdempotencyRepository {
    db: DatabaseConnection,
}

impl SeaOrmIdempotencyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: idempotency_key::Model) -> IdempotencyRecord {
    IdempotencyRecord {
        key: m.key,
        status_code: m.status_code.clamp(0, u16::MAX as i32) as u16,
        payload: m.payload,
        created_at: m.created_at,
    }
}

#[async_trait]
impl IdempotencyRepository for SeaOrmIdempotencyRepository {
    async fn get(&self, key: &str) -> DomainResult<Option<IdempotencyRecord>> {
        let model = idempotency_key::Entity::find_by_id(key)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn put_if_absent(
        &self,
        record: IdempotencyRecord,
    ) -> DomainResult<IdempotencyRecord> {
        let model = idempotency_key::ActiveModel {
            key: Set(record.key.clone()),
            status_code: Set(i32::from(record.status_code)),
            payload: Set(record.payload.clone()),
            created_at: Set(record.created_at),
        };

        match model.insert(&self.db).await {
            Ok(_) => Ok(record),
            // The primary key makes the insert conditional: a racing
            // writer already stored this key, return the earlier record
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                let existing = idempotency_key::Entity::find_by_id(&record.key)
                    .one(&self.db)
                    .await
                    .map_err(db_err)?
                    .ok_or_else(|| {
                        DomainError::Internal(
                            "idempotency record vanished after key conflict".into(),
                        )
                    })?;
                Ok(model_to_domain(existing))
            }
            Err(e) => Err(db_err(e)),
        }
    }
}
