//! Request-replay protection
//!
//! Write endpoints that carry an `Idempotency-Key` header consult this
//! service before processing and replay the cached response on a hit.
//! Only successful (2xx) responses are cached. Two racing writers with
//! the same key both proceed; the conditional insert makes the earlier
//! record win and both callers answer with it.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use crate::domain::{DomainResult, IdempotencyRecord, RepositoryProvider};

/// A cached `{status, payload}` pair ready to be replayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResponse {
    pub status_code: u16,
    pub payload: Value,
}

impl From<IdempotencyRecord> for StoredResponse {
    fn from(record: IdempotencyRecord) -> Self {
        Self {
            status_code: record.status_code,
            payload: record.payload,
        }
    }
}

/// Caches successful write responses by client-supplied key.
pub struct IdempotencyService {
    repos: Arc<dyn RepositoryProvider>,
}

impl IdempotencyService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Cached response for this key, if any.
    pub async fn lookup(&self, key: &str) -> DomainResult<Option<StoredResponse>> {
        let hit = self.repos.idempotency().get(key).await?;
        if hit.is_some() {
            debug!(key, "idempotency hit, replaying cached response");
        }
        Ok(hit.map(StoredResponse::from))
    }

    /// Record a successful response. Returns the response that should be
    /// sent to the caller: ours, or the earlier record when another writer
    /// with the same key won the race.
    pub async fn store(
        &self,
        key: &str,
        status_code: u16,
        payload: Value,
    ) -> DomainResult<StoredResponse> {
        let stored = self
            .repos
            .idempotency()
            .put_if_absent(IdempotencyRecord {
                key: key.to_string(),
                status_code,
                payload,
                created_at: Utc::now(),
            })
            .await?;
        Ok(StoredResponse::from(stored))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryRepositoryProvider;
    use serde_json::json;

    fn service() -> IdempotencyService {
        IdempotencyService::new(Arc::new(InMemoryRepositoryProvider::new()))
    }

    #[tokio::test]
    async fn miss_then_hit_replays_the_same_response() {
        let service = service();
        assert!(service.lookup("k1").await.unwrap().is_none());

        let stored = service
            .store("k1", 201, json!({"id": "res-1"}))
            .await
            .unwrap();
        assert_eq!(stored.status_code, 201);

        let hit = service.lookup("k1").await.unwrap().unwrap();
        assert_eq!(hit, stored);
    }

    #[tokio::test]
    async fn the_earlier_record_wins_collisions() {
        let service = service();
        let first = service.store("k1", 201, json!({"id": "a"})).await.unwrap();
        let second = service.store("k1", 201, json!({"id": "b"})).await.unwrap();

        assert_eq!(second, first);
        let hit = service.lookup("k1").await.unwrap().unwrap();
        assert_eq!(hit.payload, json!({"id": "a"}));
    }

    #[tokio::test]
    async fn distinct_keys_do_not_collide() {
        let service = service();
        service.store("k1", 201, json!({"id": "a"})).await.unwrap();
        service.store("k2", 200, json!({"id": "b"})).await.unwrap();

        assert_eq!(
            service.lookup("k2").await.unwrap().unwrap().payload,
            json!({"id": "b"})
        );
    }
}
