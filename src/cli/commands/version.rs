//! `burnnote version` — display version.

use console::style;

use crate::errors::Result;

/// Execute the `version` command.
pub fn execute() -> Result<()> {
    let current = env!("CARGO_PKG_VERSION");
    println!("burnnote {}", style(current).green());
    Ok(())
}
