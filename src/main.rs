//! secretsm CLI
//!
//! This is the main entry point for the CLI application.

use anyhow::Result;
use clap::Parser;
use secretsm::cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first so --debug can pick the log level
    let cli = cli::Cli::parse();

    let default_filter = if cli.debug {
        "warn,secretsm=debug"
    } else {
        "warn,secretsm=info"
    };

    // Logs go to stderr, command output to stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    cli::execute(cli).await
}
