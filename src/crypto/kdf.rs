//! Passphrase-based key derivation using scrypt.
//!
//! scrypt is memory-hard, so every offline guess against a stolen record
//! costs real memory and CPU.  Cost parameters are configurable via
//! `KdfParams` (loaded from `burnnote.toml` or the defaults below).

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::random::fill_random;
use crate::errors::{BurnNoteError, Result};

/// Length of the per-record salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Lowest accepted `log_n` (N = 1024).
pub const MIN_LOG_N: u8 = 10;

/// Highest accepted `log_n` (N = 1 048 576).
pub const MAX_LOG_N: u8 = 20;

/// Highest accepted parallelism.
pub const MAX_PARALLELISM: u32 = 16;

/// Ceiling on scrypt's working memory (128 * r * N bytes): 1 GiB.
pub const MAX_MEMORY_BYTES: u64 = 1 << 30;

/// Configurable scrypt cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// log2 of the work factor N (default: 15, N = 32 768).
    pub log_n: u8,
    /// Block size r (default: 8).
    pub block_size: u32,
    /// Parallelism p (default: 1).
    pub parallelism: u32,
}

impl KdfParams {
    /// Check the parameters without deriving anything.
    ///
    /// Every derivation runs this too; callers that consume state before
    /// deriving should run it first.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_LOG_N..=MAX_LOG_N).contains(&self.log_n) {
            return Err(BurnNoteError::KeyDerivationFailed(format!(
                "scrypt log_n must be between {MIN_LOG_N} and {MAX_LOG_N} (got {})",
                self.log_n
            )));
        }
        if self.block_size < 1 {
            return Err(BurnNoteError::KeyDerivationFailed(
                "scrypt block size must be at least 1".into(),
            ));
        }
        if !(1..=MAX_PARALLELISM).contains(&self.parallelism) {
            return Err(BurnNoteError::KeyDerivationFailed(format!(
                "scrypt parallelism must be between 1 and {MAX_PARALLELISM} (got {})",
                self.parallelism
            )));
        }

        let memory = 128u64
            .saturating_mul(u64::from(self.block_size))
            .saturating_mul(1u64 << self.log_n);
        if memory > MAX_MEMORY_BYTES {
            return Err(BurnNoteError::KeyDerivationFailed(format!(
                "scrypt would need {memory} bytes of memory (limit {MAX_MEMORY_BYTES})"
            )));
        }

        Ok(())
    }

    fn to_scrypt(self) -> Result<scrypt::Params> {
        self.validate()?;
        scrypt::Params::new(self.log_n, self.block_size, self.parallelism, KEY_LEN).map_err(|e| {
            BurnNoteError::KeyDerivationFailed(format!("invalid scrypt params: {e}"))
        })
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            log_n: 15,
            block_size: 8,
            parallelism: 1,
        }
    }
}

/// A 32-byte symmetric key that zeroes its memory when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Derive a key with the default scrypt parameters.
pub fn derive_key(passphrase: &[u8], salt: &[u8]) -> Result<DerivedKey> {
    derive_key_with_params(passphrase, salt, &KdfParams::default())
}

/// Derive a 32-byte key with explicit scrypt parameters.
///
/// The same passphrase + salt + params always produce the same key.  An
/// empty passphrase is accepted and still yields a key.
pub fn derive_key_with_params(
    passphrase: &[u8],
    salt: &[u8],
    kdf_params: &KdfParams,
) -> Result<DerivedKey> {
    let params = kdf_params.to_scrypt()?;

    let mut key = [0u8; KEY_LEN];
    scrypt::scrypt(passphrase, salt, &params, &mut key)
        .map_err(|e| BurnNoteError::KeyDerivationFailed(format!("scrypt failed: {e}")))?;

    let derived = DerivedKey(key);
    key.zeroize();
    Ok(derived)
}

/// Generate a fresh random 16-byte salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    fill_random(&mut salt)?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: KdfParams = KdfParams {
        log_n: MIN_LOG_N,
        block_size: 8,
        parallelism: 1,
    };

    #[test]
    fn default_params_match_the_reference_cost() {
        let p = KdfParams::default();
        assert_eq!(p.log_n, 15);
        assert_eq!(p.block_size, 8);
        assert_eq!(p.parallelism, 1);
    }

    #[test]
    fn same_inputs_same_key() {
        let salt = [7u8; SALT_LEN];
        let a = derive_key_with_params(b"pass", &salt, &FAST).unwrap();
        let b = derive_key_with_params(b"pass", &salt, &FAST).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn empty_passphrase_is_accepted() {
        let salt = generate_salt().unwrap();
        let key = derive_key_with_params(b"", &salt, &FAST).unwrap();
        assert_ne!(key.as_bytes(), &[0u8; KEY_LEN]);
    }

    #[test]
    fn rejects_weak_log_n() {
        let params = KdfParams {
            log_n: 4,
            ..FAST
        };
        let result = derive_key_with_params(b"pass", &[0u8; SALT_LEN], &params);
        assert!(matches!(result, Err(BurnNoteError::KeyDerivationFailed(_))));
    }

    #[test]
    fn rejects_zero_parallelism() {
        let params = KdfParams {
            parallelism: 0,
            ..FAST
        };
        assert!(derive_key_with_params(b"pass", &[0u8; SALT_LEN], &params).is_err());
    }

    #[test]
    fn rejects_oversized_log_n_before_allocating() {
        let params = KdfParams {
            log_n: 40,
            ..FAST
        };
        assert!(matches!(
            params.validate(),
            Err(BurnNoteError::KeyDerivationFailed(_))
        ));
    }

    #[test]
    fn rejects_memory_above_ceiling() {
        let params = KdfParams {
            log_n: MAX_LOG_N,
            block_size: 16,
            parallelism: 1,
        };
        assert!(params.validate().is_err());
        assert!(KdfParams::default().validate().is_ok());
        assert!(FAST.validate().is_ok());
    }

    #[test]
    fn debug_does_not_print_key_bytes() {
        let key = derive_key_with_params(b"pass", &[1u8; SALT_LEN], &FAST).unwrap();
        assert_eq!(format!("{key:?}"), "DerivedKey(..)");
    }
}
