//! CLI module — Clap argument parser, output helpers, and command implementations.
//!
//! This is the transport around `SecretService`: it turns arguments,
//! stdin, and prompts into `(plaintext, passphrase)` or `(id, passphrase)`
//! and prints the result.

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{BurnNoteError, Result};
use crate::service::SecretService;
use crate::store::SqliteStore;

/// Environment variable that supplies the passphrase non-interactively.
pub const PASSPHRASE_ENV: &str = "BURNNOTE_PASSPHRASE";

/// BurnNote CLI: secrets that burn after one read.
#[derive(Parser)]
#[command(
    name = "burnnote",
    about = "Passphrase-protected secrets that burn after the first read",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Secrets database (default: from burnnote.toml, else .burnnote/secrets.db)
    #[arg(long, global = true, env = "BURNNOTE_DB")]
    pub db: Option<PathBuf>,

    /// Config file (default: ./burnnote.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log store and service activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Seal a secret and print its one-time id
    Create {
        /// Secret message (omit to read from stdin or a hidden prompt)
        message: Option<String>,
    },

    /// Reveal a secret once; any attempt burns it
    Reveal {
        /// Secret id or share link
        id: String,
    },

    /// Reclaim expired secrets now
    Purge,

    /// Show version
    Version,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum, ignore_case = true)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings from `--config`, or `./burnnote.toml`, or defaults.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    match &cli.config {
        Some(path) => Settings::load_file(path),
        None => Settings::load(&std::env::current_dir()?),
    }
}

/// Resolve the database file: `--db` wins over the config file.
pub fn database_path(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    match &cli.db {
        Some(path) => Ok(path.clone()),
        None => Ok(settings.database_path(&std::env::current_dir()?)),
    }
}

/// Build the service over the SQLite store the CLI points at.
pub fn open_service(cli: &Cli, settings: &Settings) -> Result<SecretService<SqliteStore>> {
    let path = database_path(cli, settings)?;
    let store = SqliteStore::open(&path)?;
    Ok(SecretService::new(store, settings.service_config()?))
}

/// Get the passphrase for revealing, trying in order:
/// 1. `BURNNOTE_PASSPHRASE` env var (scripts, CI)
/// 2. Interactive hidden prompt
///
/// An empty passphrase is valid input.  Returns `Zeroizing<String>` so
/// it is wiped from memory on drop.
pub fn prompt_passphrase() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSPHRASE_ENV) {
        return Ok(Zeroizing::new(pw));
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Passphrase")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| BurnNoteError::CommandFailed(format!("passphrase prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new passphrase with confirmation (used by `create`).
///
/// Also respects `BURNNOTE_PASSPHRASE` for scripted usage.
pub fn prompt_new_passphrase() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSPHRASE_ENV) {
        return Ok(Zeroizing::new(pw));
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Choose a passphrase (empty for none)")
        .with_confirmation("Confirm passphrase", "Passphrases do not match, try again")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| BurnNoteError::CommandFailed(format!("passphrase prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Pull the id out of a bare id or a share link.
///
/// `https://host/snippet/<id>?x#y` and `<id>` both yield `<id>`.
pub fn extract_id(input: &str) -> &str {
    let input = input.trim();
    let path = input
        .split(['?', '#'])
        .next()
        .unwrap_or(input)
        .trim_end_matches('/');
    match path.rfind("/snippet/") {
        Some(pos) => &path[pos + "/snippet/".len()..],
        None => path.rsplit('/').next().unwrap_or(path),
    }
}

/// Render `path` relative to the working directory when it lies inside it.
pub fn display_path(path: &Path) -> String {
    match std::env::current_dir() {
        Ok(cwd) => path
            .strip_prefix(&cwd)
            .unwrap_or(path)
            .display()
            .to_string(),
        Err(_) => path.display().to_string(),
    }
}

/// The red line shown when `command` fails with `err`.
///
/// Store failures read differently depending on whether the command was
/// writing a secret or consuming one.
pub fn error_message(command: &Commands, err: &BurnNoteError) -> String {
    match (command, err) {
        (Commands::Create { .. }, BurnNoteError::Store(_)) => "Unable to save message".to_string(),
        _ => err.user_message(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failure_message_depends_on_command() {
        let err = BurnNoteError::Store("database is locked".into());
        let create = Commands::Create { message: None };
        let reveal = Commands::Reveal { id: "x".into() };

        assert_eq!(error_message(&create, &err), "Unable to save message");
        assert_eq!(error_message(&reveal, &err), "Message store unavailable");
        assert_eq!(error_message(&Commands::Purge, &err), "Message store unavailable");
        assert_eq!(
            error_message(&reveal, &BurnNoteError::NotFound),
            "Message not found"
        );
    }

    #[test]
    fn extract_bare_id() {
        assert_eq!(extract_id("AbCdEfGhIjKlMnOpQrStUv"), "AbCdEfGhIjKlMnOpQrStUv");
        assert_eq!(extract_id("  AbCd \n"), "AbCd");
    }

    #[test]
    fn extract_from_share_link() {
        assert_eq!(
            extract_id("https://burn.example.com/snippet/AbCdEfGh"),
            "AbCdEfGh"
        );
        assert_eq!(
            extract_id("https://burn.example.com/snippet/AbCdEfGh/?utm=x#frag"),
            "AbCdEfGh"
        );
    }

    #[test]
    fn extract_from_other_path_takes_last_segment() {
        assert_eq!(extract_id("http://localhost/s/AbCd"), "AbCd");
    }

    #[test]
    fn cli_parses_create_and_reveal() {
        let cli = Cli::parse_from(["burnnote", "create", "hello"]);
        assert!(matches!(cli.command, Commands::Create { message: Some(ref m) } if m == "hello"));

        let cli = Cli::parse_from(["burnnote", "--db", "x.db", "reveal", "abc"]);
        assert!(matches!(cli.command, Commands::Reveal { ref id } if id == "abc"));
        assert_eq!(cli.db.as_deref(), Some(Path::new("x.db")));
    }
}
