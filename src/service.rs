//! The two operations BurnNote offers: seal a secret, and reveal it once.
//!
//! `SecretService` wires the KDF, the cipher, and an injected
//! `SecretStore` together.  It keeps no mutable state of its own, so a
//! single service can be shared by reference across threads.

use std::time::Duration;

use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::crypto::{decrypt, derive_key_with_params, encrypt, generate_salt, KdfParams};
use crate::errors::{BurnNoteError, Result};
use crate::store::{SecretId, SecretStore};

/// Default lifetime of a sealed secret (24 hours).
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Knobs that shape every secret the service creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// How long a record stays retrievable before it silently expires.
    pub ttl: Duration,
    /// scrypt cost; trades passphrase-guess resistance for latency.
    pub kdf: KdfParams,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            kdf: KdfParams::default(),
        }
    }
}

/// Creates and reveals one-time secrets against a store.
#[derive(Debug)]
pub struct SecretService<S> {
    store: S,
    config: ServiceConfig,
}

impl<S: SecretStore> SecretService<S> {
    pub fn new(store: S, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Seal `plaintext` under `passphrase` and return its retrieval id.
    ///
    /// An empty passphrase is allowed; the id is then the only thing
    /// protecting the secret.  Nothing is stored unless every step
    /// succeeds.
    pub fn create(&self, plaintext: &[u8], passphrase: &[u8]) -> Result<SecretId> {
        let salt = generate_salt()?;
        let key = derive_key_with_params(passphrase, &salt, &self.config.kdf)?;
        let ciphertext = encrypt(key.as_bytes(), plaintext)?;
        drop(key);

        let id = self.store.put(&ciphertext, &salt, self.config.ttl)?;
        info!(id = %id.redacted(), ttl_secs = self.config.ttl.as_secs(), "secret created");
        Ok(id)
    }

    /// Consume the secret behind `id` and try to open it with `passphrase`.
    ///
    /// The record is removed before the passphrase is checked, so a wrong
    /// guess burns it just like a right one.  Unknown, expired, and
    /// already-revealed ids all yield `NotFound`.  Unusable KDF settings
    /// are rejected before the store is touched.
    pub fn reveal(&self, id: &str, passphrase: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        let id = SecretId::parse(id)?;
        self.config.kdf.validate()?;

        let Some(taken) = self.store.take_and_remove(&id)? else {
            info!(id = %id.redacted(), "reveal of absent secret");
            return Err(BurnNoteError::NotFound);
        };

        let key = derive_key_with_params(passphrase, &taken.salt, &self.config.kdf)?;
        match decrypt(key.as_bytes(), &taken.ciphertext) {
            Ok(plaintext) => {
                info!(id = %id.redacted(), "secret revealed and burned");
                Ok(Zeroizing::new(plaintext))
            }
            Err(e) => {
                warn!(id = %id.redacted(), "secret burned by failed unlock");
                Err(e)
            }
        }
    }

    /// Reclaim expired records now instead of waiting for a reveal.
    pub fn purge_expired(&self) -> Result<usize> {
        let purged = self.store.purge_expired()?;
        info!(purged, "purged expired secrets");
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::MIN_LOG_N;
    use crate::store::MemoryStore;

    fn service() -> SecretService<MemoryStore> {
        let config = ServiceConfig {
            kdf: KdfParams {
                log_n: MIN_LOG_N,
                ..KdfParams::default()
            },
            ..ServiceConfig::default()
        };
        SecretService::new(MemoryStore::new(), config)
    }

    #[test]
    fn default_ttl_is_one_day() {
        assert_eq!(ServiceConfig::default().ttl, Duration::from_secs(86_400));
    }

    #[test]
    fn create_stores_exactly_one_record() {
        let svc = service();
        svc.create(b"hello", b"pw").unwrap();
        assert_eq!(svc.store().len(), 1);
    }

    #[test]
    fn reveal_consumes_the_record() {
        let svc = service();
        let id = svc.create(b"hello", b"pw").unwrap();
        assert_eq!(svc.reveal(id.as_str(), b"pw").unwrap().as_slice(), b"hello");
        assert!(svc.store().is_empty());
    }

    #[test]
    fn wrong_passphrase_still_consumes() {
        let svc = service();
        let id = svc.create(b"hello", b"pw").unwrap();
        assert!(matches!(
            svc.reveal(id.as_str(), b"nope"),
            Err(BurnNoteError::DecryptionFailed)
        ));
        assert!(svc.store().is_empty());
    }

    #[test]
    fn malformed_id_is_not_found() {
        let svc = service();
        assert!(matches!(
            svc.reveal("../../etc/passwd", b"pw"),
            Err(BurnNoteError::NotFound)
        ));
    }

    #[test]
    fn bad_kdf_config_leaves_secret_in_place_on_reveal() {
        let good = service();
        let id = good.create(b"hello", b"pw").unwrap();

        let broken = SecretService::new(
            good.store().clone(),
            ServiceConfig {
                kdf: KdfParams {
                    log_n: 5,
                    ..KdfParams::default()
                },
                ..ServiceConfig::default()
            },
        );
        assert!(matches!(
            broken.reveal(id.as_str(), b"pw"),
            Err(BurnNoteError::KeyDerivationFailed(_))
        ));
        assert_eq!(good.store().len(), 1);

        assert_eq!(good.reveal(id.as_str(), b"pw").unwrap().as_slice(), b"hello");
    }

    #[test]
    fn bad_kdf_config_aborts_create_without_storing() {
        let config = ServiceConfig {
            kdf: KdfParams {
                log_n: 1,
                ..KdfParams::default()
            },
            ..ServiceConfig::default()
        };
        let svc = SecretService::new(MemoryStore::new(), config);
        assert!(matches!(
            svc.create(b"hello", b"pw"),
            Err(BurnNoteError::KeyDerivationFailed(_))
        ));
        assert!(svc.store().is_empty());
    }
}
