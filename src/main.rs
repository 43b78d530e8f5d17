use clap::Parser;
use tracing_subscriber::EnvFilter;

use seqplace::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("seqplace=debug,info")
    } else {
        EnvFilter::new("seqplace=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Place(args) => {
            cli::place::run(args, cli.verbose)?;
        }
        cli::Commands::Find(args) => {
            cli::find::run(args)?;
        }
        cli::Commands::Maps(args) => {
            cli::maps::run(args)?;
        }
    }

    Ok(())
}
