//! `burnnote purge` — reclaim expired secrets.

use crate::cli::output;
use crate::cli::{database_path, display_path, load_settings, open_service, Cli};
use crate::errors::Result;

/// Execute the `purge` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli)?;
    let service = open_service(cli, &settings)?;

    let purged = service.purge_expired()?;
    let path = database_path(cli, &settings)?;

    if purged == 0 {
        output::info(&format!("No expired secrets in {}", display_path(&path)));
    } else {
        output::success(&format!(
            "Purged {purged} expired secret(s) from {}",
            display_path(&path)
        ));
    }

    Ok(())
}
