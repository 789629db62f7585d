//! digestor: concurrent file digesting tool

use std::process::ExitCode;

use clap::Parser;
use digestor_cli::commands;
use digestor_cli::Commands;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "digestor")]
#[command(author, version, about = "Concurrent multi-algorithm file digesting", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let outcome = commands::execute(cli.command).await?;
    Ok(outcome.exit_code())
}
