//! In-memory slot lock store
//!
//! Implements the lock-store contract the same way a Redis-style service
//! would: set-if-absent with TTL and delete-if-value-matches, both atomic
//! per key. Expired entries are reclaimed lazily on the next acquisition
//! attempt.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::time::Instant;

use crate::domain::{DomainResult, LockStore};

struct LockEntry {
    token: String,
    expires_at: Instant,
}

/// DashMap-backed lock store; per-key atomicity comes from the map's
/// entry locking.
#[derive(Default)]
pub struct InMemoryLockStore {
    entries: DashMap<String, LockEntry>,
}

impl InMemoryLockStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LockStore for InMemoryLockStore {
    async fn acquire(&self, key: &str, token: &str, ttl: Duration) -> DomainResult<bool> {
        let now = Instant::now();
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut held) => {
                if held.get().expires_at <= now {
                    held.insert(LockEntry {
                        token: token.to_string(),
                        expires_at: now + ttl,
                    });
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(LockEntry {
                    token: token.to_string(),
                    expires_at: now + ttl,
                });
                Ok(true)
            }
        }
    }

    async fn release(&self, key: &str, token: &str) -> DomainResult<()> {
        self.entries.remove_if(key, |_, entry| entry.token == token);
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────
