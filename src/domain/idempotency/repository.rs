//! Idempotency repository interface

use async_trait::async_trait;

use super::model::IdempotencyRecord;
use crate::domain::DomainResult;

#[async_trait]
pub trait IdempotencyRepository: Send + Sync {
    /// Look up a cached response by key
    async fn get(&self, key: &str) -> DomainResult<Option<IdempotencyRecord>>;

    /// Conditional insert: stores the record iff the key is absent and
    /// returns whichever record ended up stored. Two racing writers both
    /// receive the earlier record.
    async fn put_if_absent(&self, record: IdempotencyRecord)
        -> DomainResult<IdempotencyRecord>;
}
