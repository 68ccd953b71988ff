use burnnote::cli::{Cli, Commands};
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    burnnote::logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Create { ref message } => {
            burnnote::cli::commands::create::execute(&cli, message.as_deref())
        }
        Commands::Reveal { ref id } => burnnote::cli::commands::reveal::execute(&cli, id),
        Commands::Purge => burnnote::cli::commands::purge::execute(&cli),
        Commands::Version => burnnote::cli::commands::version::execute(),
        Commands::Completions { shell } => burnnote::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "command failed");
        burnnote::cli::output::error(&burnnote::cli::error_message(&cli.command, &e));
        std::process::exit(1);
    }
}
