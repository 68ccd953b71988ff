//! `burnnote completions` — generate shell completion scripts.
//!
//! Usage:
//!   burnnote completions bash > ~/.bash_completion.d/burnnote
//!   burnnote completions zsh

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `completions` command.
pub fn execute(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::cli::{Cli, Commands};

    use super::*;

    #[test]
    fn shell_names_parse_case_insensitively() {
        let cli = Cli::parse_from(["burnnote", "completions", "ZSH"]);
        assert!(matches!(
            cli.command,
            Commands::Completions { shell: Shell::Zsh }
        ));
    }

    #[test]
    fn unknown_shell_is_rejected() {
        assert!(Cli::try_parse_from(["burnnote", "completions", "csh"]).is_err());
    }
}
