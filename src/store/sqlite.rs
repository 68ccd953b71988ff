//! SQLite-backed secret store.
//!
//! Records live in one table at `<path>`:
//!
//! ```text
//! secrets(id TEXT PRIMARY KEY, ciphertext BLOB, salt BLOB, expires_at INTEGER)
//! ```
//!
//! Every operation opens its own connection and runs in an IMMEDIATE
//! transaction, so concurrent takers serialize on SQLite's write lock.
//! `take_and_remove` is a single `DELETE ... RETURNING`: a row is returned
//! by the same statement that deletes it, and only once.
//!
//! Connections run with `secure_delete` on, so a deleted row's bytes are
//! zeroed in the page rather than left in free space, and a take ends with
//! a truncating WAL checkpoint so the log does not keep the old frames.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{params, Connection, ErrorCode, TransactionBehavior};
use tracing::{debug, warn};

use super::record::{SecretId, TakenSecret};
use super::{expiry_after, now, SecretStore, MAX_ID_ATTEMPTS};
use crate::errors::{BurnNoteError, Result};

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to a secrets database file.  Cheap to clone.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    ///
    /// Creates the parent directory and schema if missing, switches the
    /// file to WAL mode, and restricts it to the owner on Unix.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let store = Self {
            path: path.to_path_buf(),
        };
        let conn = store.connect()?;

        // journal_mode answers with a row, so it cannot go through execute.
        conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS secrets (
                id          TEXT PRIMARY KEY,
                ciphertext  BLOB NOT NULL,
                salt        BLOB NOT NULL,
                expires_at  INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS secrets_expires_at ON secrets (expires_at);",
        )?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        debug!(path = %path.display(), "opened secrets database");
        Ok(store)
    }

    /// Path to the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of rows physically present, expired or not.
    pub fn len(&self) -> Result<usize> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM secrets", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        // Like journal_mode, secure_delete answers with the new setting.
        conn.query_row("PRAGMA secure_delete = ON", [], |_| Ok(()))?;
        Ok(conn)
    }
}

/// Copy the WAL into the main file and cut the log to zero length.
///
/// The take has already committed by the time this runs, so a failure is
/// logged rather than returned.
fn truncate_wal(conn: &Connection) {
    let result = conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |row| {
        row.get::<_, i64>(0)
    });
    match result {
        Ok(0) => {}
        Ok(_) => debug!("wal checkpoint deferred by concurrent readers"),
        Err(e) => warn!(error = %e, "wal checkpoint failed"),
    }
}

/// True when an insert hit the primary key of an existing row.
fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

impl SecretStore for SqliteStore {
    fn put(&self, ciphertext: &[u8], salt: &[u8], ttl: Duration) -> Result<SecretId> {
        let conn = self.connect()?;
        let expires_at = expiry_after(now(), ttl);

        for _ in 0..MAX_ID_ATTEMPTS {
            let id = SecretId::generate()?;
            match conn.execute(
                "INSERT INTO secrets (id, ciphertext, salt, expires_at) VALUES (?1, ?2, ?3, ?4)",
                params![id.as_str(), ciphertext, salt, expires_at],
            ) {
                Ok(_) => {
                    debug!(id = %id.redacted(), expires_at, "stored secret");
                    return Ok(id);
                }
                Err(e) if is_constraint_violation(&e) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(BurnNoteError::Store(
            "could not allocate an unused secret id".into(),
        ))
    }

    fn take_and_remove(&self, id: &SecretId) -> Result<Option<TakenSecret>> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let taken = {
            let mut stmt = tx.prepare(
                "DELETE FROM secrets WHERE id = ?1 RETURNING ciphertext, salt, expires_at",
            )?;
            // Drain the rows so the statement runs to completion before commit.
            let rows = stmt
                .query_map(params![id.as_str()], |row| {
                    Ok((
                        row.get::<_, Vec<u8>>(0)?,
                        row.get::<_, Vec<u8>>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows.into_iter().next()
        };
        tx.commit()?;
        if taken.is_some() {
            truncate_wal(&conn);
        }

        match taken {
            None => Ok(None),
            Some((_, _, expires_at)) if now() >= expires_at => {
                debug!(id = %id.redacted(), "lazy-evicted expired secret");
                Ok(None)
            }
            Some((ciphertext, salt, _)) => {
                debug!(id = %id.redacted(), "took secret");
                Ok(Some(TakenSecret { ciphertext, salt }))
            }
        }
    }

    fn purge_expired(&self) -> Result<usize> {
        let conn = self.connect()?;
        let purged = conn.execute(
            "DELETE FROM secrets WHERE expires_at <= ?1",
            params![now()],
        )?;
        if purged > 0 {
            truncate_wal(&conn);
            debug!(purged, "purged expired secrets");
        }
        Ok(purged)
    }
}
