//! `burnnote reveal` — consume a secret and print it.

use std::io::{self, IsTerminal, Write};

use crate::cli::output;
use crate::cli::{extract_id, load_settings, open_service, prompt_passphrase, Cli};
use crate::errors::{BurnNoteError, Result};

/// Execute the `reveal` command.
///
/// The secret is gone after this runs, whether or not the passphrase
/// was right.
pub fn execute(cli: &Cli, id_or_link: &str) -> Result<()> {
    let settings = load_settings(cli)?;
    let id = extract_id(id_or_link);

    let passphrase = prompt_passphrase()?;
    let service = open_service(cli, &settings)?;

    let plaintext = match service.reveal(id, passphrase.as_bytes()) {
        Ok(plaintext) => plaintext,
        Err(e) => {
            if matches!(e, BurnNoteError::Store(_)) {
                output::warning("The secret may already have been consumed; retrying can fail.");
            }
            return Err(e);
        }
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(&plaintext)?;
    if stdout.is_terminal() && !plaintext.ends_with(b"\n") {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;

    output::info("This secret has now been burned.");

    Ok(())
}
