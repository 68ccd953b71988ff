use thiserror::Error;

/// All errors that can occur in BurnNote.
///
/// None of the messages carry plaintext, passphrases, or key material.
#[derive(Debug, Error)]
pub enum BurnNoteError {
    // --- Crypto errors ---
    #[error("Random source unavailable: {0}")]
    RandomSource(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong passphrase or corrupted data")]
    DecryptionFailed,

    // --- Store errors ---
    #[error("Secret not found — it never existed, expired, or was already revealed")]
    NotFound,

    #[error("Store error: {0}")]
    Store(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl BurnNoteError {
    /// The message shown to whoever asked for the operation.
    ///
    /// Internal faults collapse to a generic line; `NotFound` and
    /// `DecryptionFailed` never say more than they must.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound => "Message not found".to_string(),
            Self::DecryptionFailed => "Wrong password".to_string(),
            Self::RandomSource(_) | Self::KeyDerivationFailed(_) | Self::EncryptionFailed(_) => {
                "Unable to encrypt message".to_string()
            }
            Self::Store(_) => "Message store unavailable".to_string(),
            Self::Config(_) | Self::Io(_) | Self::CommandFailed(_) => self.to_string(),
        }
    }

    /// Whether repeating a failed `create` cannot cause harm.
    ///
    /// A failed `reveal` is never safe to repeat blindly: the record may
    /// already have been consumed by the first attempt.
    pub fn is_retry_safe_for_create(&self) -> bool {
        matches!(self, Self::Store(_) | Self::RandomSource(_))
    }
}

#[cfg(feature = "sqlite-store")]
impl From<rusqlite::Error> for BurnNoteError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Store(e.to_string())
    }
}

/// Convenience type alias for BurnNote results.
pub type Result<T> = std::result::Result<T, BurnNoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_is_uniform() {
        assert_eq!(BurnNoteError::NotFound.user_message(), "Message not found");
    }

    #[test]
    fn auth_failure_message_is_generic() {
        assert_eq!(
            BurnNoteError::DecryptionFailed.user_message(),
            "Wrong password"
        );
    }

    #[test]
    fn internal_faults_do_not_leak_detail() {
        let err = BurnNoteError::KeyDerivationFailed("log_n too small".into());
        assert_eq!(err.user_message(), "Unable to encrypt message");
        let err = BurnNoteError::Store("disk I/O error".into());
        assert_eq!(err.user_message(), "Message store unavailable");
    }

    #[test]
    fn only_transient_failures_are_retry_safe() {
        assert!(BurnNoteError::Store("busy".into()).is_retry_safe_for_create());
        assert!(!BurnNoteError::DecryptionFailed.is_retry_safe_for_create());
        assert!(!BurnNoteError::NotFound.is_retry_safe_for_create());
    }
}
