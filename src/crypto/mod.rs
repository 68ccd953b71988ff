//! Cryptographic primitives for BurnNote.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - scrypt passphrase-based key derivation (`kdf`)
//! - OS-backed randomness for salts, nonces, and ids (`random`)

pub mod encryption;
pub mod kdf;
pub mod random;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use encryption::{decrypt, encrypt};
pub use kdf::{
    derive_key, derive_key_with_params, generate_salt, DerivedKey, KdfParams, KEY_LEN, SALT_LEN,
};
pub use random::fill_random;
