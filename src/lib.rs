//! BurnNote: passphrase-protected secrets that can be read at most once.
//!
//! `SecretService::create` seals a message under a passphrase and hands
//! back an id; `SecretService::reveal` consumes the record behind that id
//! and opens it.  The record is gone after the first reveal attempt,
//! whether or not the passphrase was right.

#[cfg(feature = "sqlite-store")]
pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod logging;
pub mod service;
pub mod store;

pub use errors::{BurnNoteError, Result};
pub use service::{SecretService, ServiceConfig};
pub use store::{SecretId, SecretStore};
