//! Per-slot lock manager
//!
//! Serializes competing writers on `(scope, 15-minute slot)` keys over the
//! reservation's half-open interval. Keys are canonical UTC so writers in
//! different local representations of the same slot contend on the same
//! key, and acquisition walks the sorted key list so two writers with
//! intersecting intervals can never deadlock. Acquisition is fail-fast: a
//! busy key rolls back everything already taken and fails the attempt.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::application::scheduling::slot_instants;
use crate::domain::{DomainError, DomainResult, LockStore};

/// TTL bounding locks stranded by crashed holders
pub const DEFAULT_LOCK_TTL: Duration = Duration::from_secs(30);

/// Acquires and releases slot locks for sectors and restaurants.
pub struct SlotLockManager {
    store: Arc<dyn LockStore>,
    ttl: Duration,
}

impl SlotLockManager {
    pub fn new(store: Arc<dyn LockStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Mutual exclusion over every sector slot in `[start, end)`.
    pub async fn lock_sector(
        &self,
        sector_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<SlotLockGuard> {
        self.lock_keys(slot_keys("sector", sector_id, start, end)).await
    }

    /// Mutual exclusion over every restaurant slot in `[start, end)`;
    /// used only when a guest cap is configured.
    pub async fn lock_restaurant(
        &self,
        restaurant_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<SlotLockGuard> {
        self.lock_keys(slot_keys("restaurant", restaurant_id, start, end))
            .await
    }

    async fn lock_keys(&self, keys: Vec<String>) -> DomainResult<SlotLockGuard> {
        let token = Uuid::new_v4().to_string();
        for held in 0..keys.len() {
            let acquired = match self.store.acquire(&keys[held], &token, self.ttl).await {
                Ok(acquired) => acquired,
                Err(e) => {
                    release_keys(&self.store, &keys[..held], &token).await;
                    return Err(e);
                }
            };
            if !acquired {
                release_keys(&self.store, &keys[..held], &token).await;
                return Err(DomainError::NoCapacity("lock busy".into()));
            }
        }
        Ok(SlotLockGuard {
            store: Arc::clone(&self.store),
            token,
            keys,
        })
    }
}

/// Sorted lock keys for every 15-minute slot instant in `[start, end)`.
fn slot_keys(scope: &str, id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<String> {
    let mut keys: Vec<String> = slot_instants(start, end)
        .into_iter()
        .map(|s| {
            format!(
                "{}:{}:slot:{}",
                scope,
                id,
                s.to_rfc3339_opts(SecondsFormat::Secs, true)
            )
        })
        .collect();
    keys.sort();
    keys
}

async fn release_keys(store: &Arc<dyn LockStore>, keys: &[String], token: &str) {
    for key in keys {
        if let Err(e) = store.release(key, token).await {
            warn!(key, error = %e, "failed to release slot lock");
        }
    }
}

/// Release handle over a set of acquired slot keys.
///
/// Callers release explicitly on every exit path; the store TTL is only a
/// backstop for crashed holders. Deletes are token-conditioned so an
/// expired-and-reacquired key is never stolen from its new holder.
#[must_use = "slot locks must be released explicitly"]
pub struct SlotLockGuard {
    store: Arc<dyn LockStore>,
    token: String,
    keys: Vec<String>,
}

impl std::fmt::Debug for SlotLockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotLockGuard")
            .field("token", &self.token)
            .field("keys", &self.keys)
            .finish()
    }
}

impl SlotLockGuard {
    pub async fn release(self) {
        release_keys(&self.store, &self.keys, &self.token).await;
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }
}

// ── Tests ──────────────────────────────────────────────────────
