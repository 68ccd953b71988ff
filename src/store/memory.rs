//! In-process secret store backed by a concurrent map.
//!
//! `DashMap::remove` is the atomic primitive here: it hands the removed
//! entry to exactly one caller.  Clones share the same map, so one store
//! can be handed to many threads.

use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use super::record::{SecretId, SecretRecord, TakenSecret};
use super::{expiry_after, now, SecretStore, MAX_ID_ATTEMPTS};
use crate::errors::{BurnNoteError, Result};

/// Records held in memory; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<DashMap<SecretId, SecretRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records physically present, expired or not.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SecretStore for MemoryStore {
    fn put(&self, ciphertext: &[u8], salt: &[u8], ttl: Duration) -> Result<SecretId> {
        let expires_at = expiry_after(now(), ttl);

        for _ in 0..MAX_ID_ATTEMPTS {
            let id = SecretId::generate()?;
            // The entry guard holds the shard lock, so the vacancy check
            // and the insert cannot be split by another writer.
            if let Entry::Vacant(slot) = self.records.entry(id.clone()) {
                slot.insert(SecretRecord {
                    id: id.clone(),
                    ciphertext: ciphertext.to_vec(),
                    salt: salt.to_vec(),
                    expires_at,
                });
                debug!(id = %id.redacted(), expires_at, "stored secret");
                return Ok(id);
            }
        }

        Err(BurnNoteError::Store(
            "could not allocate an unused secret id".into(),
        ))
    }

    fn take_and_remove(&self, id: &SecretId) -> Result<Option<TakenSecret>> {
        let Some((_, record)) = self.records.remove(id) else {
            return Ok(None);
        };

        if record.is_expired(now()) {
            debug!(id = %id.redacted(), "lazy-evicted expired secret");
            return Ok(None);
        }

        debug!(id = %id.redacted(), "took secret");
        Ok(Some(TakenSecret {
            ciphertext: record.ciphertext,
            salt: record.salt,
        }))
    }

    fn purge_expired(&self) -> Result<usize> {
        let now = now();
        let expired: Vec<SecretId> = self
            .records
            .iter()
            .filter(|entry| entry.value().is_expired(now))
            .map(|entry| entry.key().clone())
            .collect();

        let mut purged = 0;
        for id in expired {
            if self
                .records
                .remove_if(&id, |_, record| record.is_expired(now))
                .is_some()
            {
                purged += 1;
            }
        }

        if purged > 0 {
            debug!(purged, "purged expired secrets");
        }
        Ok(purged)
    }
}
