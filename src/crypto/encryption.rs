//! AES-256-GCM authenticated encryption.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! prepends it to the ciphertext.  `decrypt` splits the nonce back out
//! before decrypting, so a stored blob is self-describing.
//!
//! Layout of the returned byte buffer:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use super::random::fill_random;
use crate::errors::{BurnNoteError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` with a 32-byte `key`.
///
/// Returns the nonce prepended to the ciphertext (nonce || ciphertext).
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| BurnNoteError::EncryptionFailed(format!("invalid key length: {e}")))?;

    // A nonce must never repeat under one key, so it always comes from the OS.
    let mut nonce_bytes = [0u8; NONCE_LEN];
    fill_random(&mut nonce_bytes)?;
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| BurnNoteError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&nonce_bytes);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypt data that was produced by `encrypt`.
///
/// Every failure, whether truncated input, wrong key, or a flipped bit,
/// comes back as the same `DecryptionFailed`.
pub fn decrypt(key: &[u8], ciphertext_with_nonce: &[u8]) -> Result<Vec<u8>> {
    if ciphertext_with_nonce.len() < NONCE_LEN + TAG_LEN {
        return Err(BurnNoteError::DecryptionFailed);
    }

    let (nonce_bytes, ciphertext) = ciphertext_with_nonce.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| BurnNoteError::DecryptionFailed)?;

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| BurnNoteError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_carries_nonce_and_tag() {
        let ct = encrypt(&[0x11u8; 32], b"abc").unwrap();
        assert_eq!(ct.len(), NONCE_LEN + 3 + TAG_LEN);
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let key = [0x22u8; 32];
        let ct = encrypt(&key, b"").unwrap();
        assert_eq!(decrypt(&key, &ct).unwrap(), b"");
    }

    #[test]
    fn short_key_is_an_encryption_failure() {
        let result = encrypt(&[0u8; 16], b"abc");
        assert!(matches!(result, Err(BurnNoteError::EncryptionFailed(_))));
    }

    #[test]
    fn nonce_only_input_is_rejected() {
        let result = decrypt(&[0u8; 32], &[0u8; NONCE_LEN]);
        assert!(matches!(result, Err(BurnNoteError::DecryptionFailed)));
    }
}
