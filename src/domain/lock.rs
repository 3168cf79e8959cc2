//! Distributed lock store interface
//!
//! Any service supporting atomic set-if-absent with TTL and atomic
//! delete-if-value-matches satisfies this trait; the in-memory
//! implementation lives in `infrastructure::memory::locks`. The slot-key
//! protocol on top of it is `application::locking::SlotLockManager`.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainResult;

#[async_trait]
pub trait LockStore: Send + Sync {
    /// Atomically set `key` to `token` with the given TTL iff the key is
    /// absent (or its previous holder's TTL elapsed). Returns `false` when
    /// the key is currently held by another token.
    async fn acquire(&self, key: &str, token: &str, ttl: Duration) -> DomainResult<bool>;

    /// Delete `key` iff its stored value equals `token`. Releasing a key
    /// that expired and was re-acquired by someone else is a no-op.
    async fn release(&self, key: &str, token: &str) -> DomainResult<()>;
}
