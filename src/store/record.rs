//! Secret records and the ids that address them.
//!
//! A record holds only what is needed to reveal it once: the sealed
//! ciphertext, the KDF salt, and an absolute expiry.  The passphrase is
//! never stored, so the store alone cannot open anything.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::crypto::fill_random;
use crate::errors::{BurnNoteError, Result};

/// Number of random bytes behind every id (128 bits).
pub const ID_LEN: usize = 16;

/// Characters of an id kept when it is written to logs.
const LOG_PREFIX_LEN: usize = 6;

/// Opaque, unguessable retrieval token.
///
/// Rendered as unpadded URL-safe base64 so it can sit in a link as is.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SecretId(String);

impl SecretId {
    /// Draw a fresh id from the OS random source.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; ID_LEN];
        fill_random(&mut bytes)?;
        Ok(Self(URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Accept an id supplied by a caller.
    ///
    /// Anything that could not have been produced by `generate` is
    /// reported as `NotFound`, exactly like an id that was never issued.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        match URL_SAFE_NO_PAD.decode(raw) {
            Ok(bytes) if bytes.len() == ID_LEN => Ok(Self(raw.to_string())),
            _ => Err(BurnNoteError::NotFound),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A short prefix that is safe to put in logs.
    ///
    /// The full id is a bearer token, so logs only ever see a prefix.
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(LOG_PREFIX_LEN).collect();
        format!("{prefix}…")
    }
}

impl fmt::Display for SecretId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SecretId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretId({})", self.redacted())
    }
}

/// A stored secret.
#[derive(Debug, Clone)]
pub struct SecretRecord {
    pub id: SecretId,
    /// Nonce-prefixed AES-256-GCM ciphertext.
    pub ciphertext: Vec<u8>,
    /// Salt for this record's key derivation.
    pub salt: Vec<u8>,
    /// Unix timestamp (seconds) after which the record is gone.
    pub expires_at: i64,
}

impl SecretRecord {
    /// Returns true once `now` has reached the expiry.
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

/// What a successful take hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakenSecret {
    pub ciphertext: Vec<u8>,
    pub salt: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_22_url_safe_chars() {
        let id = SecretId::generate().unwrap();
        assert_eq!(id.as_str().len(), 22);
        assert!(id
            .as_str()
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'));
    }

    #[test]
    fn parse_accepts_generated_ids() {
        let id = SecretId::generate().unwrap();
        assert_eq!(SecretId::parse(id.as_str()).unwrap(), id);
    }

    #[test]
    fn parse_rejects_garbage_as_not_found() {
        assert!(matches!(
            SecretId::parse("not-an-id"),
            Err(BurnNoteError::NotFound)
        ));
        assert!(matches!(SecretId::parse(""), Err(BurnNoteError::NotFound)));
        // A uuid, as older links used, is not a valid id here.
        assert!(SecretId::parse("0b7c9a9e-3c4f-4a55-9d0e-1f2a3b4c5d6e").is_err());
    }

    #[test]
    fn debug_and_redacted_hide_the_full_id() {
        let id = SecretId::generate().unwrap();
        let shown = format!("{id:?}");
        assert!(!shown.contains(id.as_str()));
        assert!(id.redacted().starts_with(&id.as_str()[..LOG_PREFIX_LEN]));
    }

    #[test]
    fn expiry_is_inclusive() {
        let record = SecretRecord {
            id: SecretId::generate().unwrap(),
            ciphertext: vec![],
            salt: vec![],
            expires_at: 100,
        };
        assert!(!record.is_expired(99));
        assert!(record.is_expired(100));
        assert!(record.is_expired(101));
    }
}
