//! Idempotency record entity

use chrono::{DateTime, Utc};
use serde_json::Value;

/// A cached successful response, keyed by a client-chosen opaque string.
///
/// Keys are globally scoped: two clients reusing the same key collide by
/// contract. The status code is stored so a replay reproduces the original
/// response exactly.
#[derive(Debug, Clone)]
pub struct IdempotencyRecord {
    pub key: String,
    pub status_code: u16,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}
