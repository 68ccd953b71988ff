//! `burnnote create` — seal a secret and print its one-time id.

use std::io::{self, IsTerminal, Read};

use chrono::{TimeDelta, Utc};
use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{load_settings, open_service, prompt_new_passphrase, Cli};
use crate::errors::{BurnNoteError, Result};

/// Execute the `create` command.
pub fn execute(cli: &Cli, message: Option<&str>) -> Result<()> {
    let settings = load_settings(cli)?;

    // Determine the secret from one of three sources.
    let secret = if let Some(m) = message {
        // Source 1: Inline message on the command line.
        output::warning("Message provided on command line — it may appear in shell history.");
        Zeroizing::new(m.to_string())
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed_len = buf.trim_end_matches(['\r', '\n']).len();
        buf.truncate(trimmed_len);
        buf
    } else {
        // Source 3: Interactive secure prompt (default).
        let m = dialoguer::Password::new()
            .with_prompt("Secret message")
            .allow_empty_password(true)
            .interact()
            .map_err(|e| BurnNoteError::CommandFailed(format!("input prompt: {e}")))?;
        Zeroizing::new(m)
    };

    if secret.is_empty() {
        output::warning("The message is empty; sealing it anyway.");
    }

    let passphrase = prompt_new_passphrase()?;
    if passphrase.is_empty() {
        output::warning("No passphrase set — anyone holding the id can read the secret.");
    }

    let service = open_service(cli, &settings)?;
    let id = match service.create(secret.as_bytes(), passphrase.as_bytes()) {
        Ok(id) => id,
        Err(e) => {
            if e.is_retry_safe_for_create() {
                output::tip("Nothing was stored; it is safe to run create again.");
            }
            return Err(e);
        }
    };

    let ttl_secs = i64::try_from(service.config().ttl.as_secs()).unwrap_or(i64::MAX);
    match TimeDelta::try_seconds(ttl_secs).and_then(|ttl| Utc::now().checked_add_signed(ttl)) {
        Some(expires) => output::success(&format!(
            "Secret sealed. It burns on first reveal, or at {}.",
            expires.format("%Y-%m-%d %H:%M:%S UTC")
        )),
        None => output::success("Secret sealed. It burns on first reveal."),
    }

    // Only the id or link goes to stdout so it can be captured.
    match settings.share_url(&id) {
        Some(url) => println!("{url}"),
        None => println!("{id}"),
    }

    output::tip("Share it with: burnnote reveal <id>");

    Ok(())
}
