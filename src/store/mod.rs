//! Store module — single-read storage for sealed secrets.
//!
//! This module provides:
//! - `SecretId`, `SecretRecord`, and `TakenSecret` types (`record`)
//! - The `SecretStore` trait with atomic take-and-remove
//! - An in-process backend (`memory`) and a SQLite backend (`sqlite`)
//!
//! The store treats ciphertext and salt as opaque bytes.  Its one hard
//! obligation is that `take_and_remove` hands a record to at most one
//! caller, however many race for it.

pub mod memory;
pub mod record;
#[cfg(feature = "sqlite-store")]
pub mod sqlite;

use std::time::Duration;

use chrono::Utc;

use crate::errors::Result;

// Re-export the most commonly used items.
pub use memory::MemoryStore;
pub use record::{SecretId, SecretRecord, TakenSecret, ID_LEN};
#[cfg(feature = "sqlite-store")]
pub use sqlite::SqliteStore;

/// How many fresh ids `put` will draw before giving up on collisions.
pub(crate) const MAX_ID_ATTEMPTS: usize = 3;

/// Keyed storage with time-to-live and atomic fetch-and-delete.
///
/// Implementations are shared across threads by reference; they must not
/// rely on callers for mutual exclusion.
pub trait SecretStore: Send + Sync {
    /// Persist a new record under a freshly generated id.
    ///
    /// Never overwrites a live record.  The record becomes visible only
    /// once it is completely written.
    fn put(&self, ciphertext: &[u8], salt: &[u8], ttl: Duration) -> Result<SecretId>;

    /// Atomically fetch and delete the record for `id`.
    ///
    /// Returns `None` when there is no record or it has expired; an
    /// expired record is deleted on the way out.  Of any number of
    /// concurrent callers for the same id, at most one gets `Some`.
    fn take_and_remove(&self, id: &SecretId) -> Result<Option<TakenSecret>>;

    /// Physically remove every expired record; returns how many went.
    fn purge_expired(&self) -> Result<usize>;
}

/// Current Unix time in seconds.
pub(crate) fn now() -> i64 {
    Utc::now().timestamp()
}

/// Absolute expiry for a record created at `now` with lifetime `ttl`.
pub(crate) fn expiry_after(now: i64, ttl: Duration) -> i64 {
    let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
    now.saturating_add(ttl_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_adds_ttl_seconds() {
        assert_eq!(expiry_after(1_000, Duration::from_secs(86_400)), 87_400);
        assert_eq!(expiry_after(1_000, Duration::ZERO), 1_000);
    }

    #[test]
    fn expiry_saturates_on_huge_ttl() {
        assert_eq!(expiry_after(1_000, Duration::from_secs(u64::MAX)), i64::MAX);
    }
}
