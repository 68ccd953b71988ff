use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::crypto::KdfParams;
use crate::errors::{BurnNoteError, Result};
use crate::service::ServiceConfig;
use crate::store::SecretId;

/// Runtime configuration, loaded from `burnnote.toml`.
///
/// Every field has a sensible default so BurnNote works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Lifetime of a secret in seconds before it silently expires (default: 24 h).
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// scrypt log2(N) work factor (default: 15).
    #[serde(default = "default_scrypt_log_n")]
    pub scrypt_log_n: u8,

    /// scrypt block size r (default: 8).
    #[serde(default = "default_scrypt_block_size")]
    pub scrypt_block_size: u32,

    /// scrypt parallelism p (default: 1).
    #[serde(default = "default_scrypt_parallelism")]
    pub scrypt_parallelism: u32,

    /// SQLite database file, relative to the working directory.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Base of share links, e.g. `https://burn.example.com`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_base_url: Option<String>,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_ttl_secs() -> u64 {
    86_400 // 24 h
}

fn default_scrypt_log_n() -> u8 {
    15 // N = 32768
}

fn default_scrypt_block_size() -> u32 {
    8
}

fn default_scrypt_parallelism() -> u32 {
    1
}

fn default_database_path() -> String {
    ".burnnote/secrets.db".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            scrypt_log_n: default_scrypt_log_n(),
            scrypt_block_size: default_scrypt_block_size(),
            scrypt_parallelism: default_scrypt_parallelism(),
            database_path: default_database_path(),
            share_base_url: None,
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    pub const FILE_NAME: &'static str = "burnnote.toml";

    /// Load settings from `<dir>/burnnote.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_file(&config_path)
    }

    /// Load settings from an explicit file, which must exist.
    pub fn load_file(config_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(config_path).map_err(|e| {
            BurnNoteError::Config(format!("Failed to read {}: {e}", config_path.display()))
        })?;

        toml::from_str(&contents).map_err(|e| {
            BurnNoteError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })
    }

    /// Resolve the database path against `base_dir`.
    pub fn database_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.database_path)
    }

    /// Convert the scrypt settings into crypto-layer params.
    pub fn kdf_params(&self) -> KdfParams {
        KdfParams {
            log_n: self.scrypt_log_n,
            block_size: self.scrypt_block_size,
            parallelism: self.scrypt_parallelism,
        }
    }

    /// Build the service configuration, rejecting a zero lifetime and
    /// scrypt settings that could never derive a key.
    pub fn service_config(&self) -> Result<ServiceConfig> {
        if self.ttl_secs == 0 {
            return Err(BurnNoteError::Config(
                "ttl_secs must be greater than zero".into(),
            ));
        }
        let kdf = self.kdf_params();
        kdf.validate()
            .map_err(|e| BurnNoteError::Config(format!("Invalid scrypt settings: {e}")))?;
        Ok(ServiceConfig {
            ttl: Duration::from_secs(self.ttl_secs),
            kdf,
        })
    }

    /// Share link for `id`, if a base URL is configured.
    ///
    /// Example: `https://burn.example.com/snippet/<id>`
    pub fn share_url(&self, id: &SecretId) -> Option<String> {
        self.share_base_url
            .as_deref()
            .map(|base| format!("{}/snippet/{id}", base.trim_end_matches('/')))
    }
}

// ── Tests ────────────────────────────────────────────────────────────
