//! CLI parsing and command execution
//!
//! This module handles command-line argument parsing and routes commands to the appropriate handlers.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::backends::{AwsSecretsClient, Backend, SecretBackend};
use crate::compare;
use crate::config::{Config, FileConfig};
use crate::listing;
use crate::mutation;
use crate::output;
use crate::payload;

#[derive(Parser)]
#[command(name = "secretsm")]
#[command(about = "Work with AWS Secrets Manager", long_about = None)]
#[command(version)]
pub struct Cli {
    /// AWS region
    #[arg(short = 'a', long, env = "AWS_REGION", global = true)]
    pub region: Option<String>,

    /// Debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Path to configuration file
    #[arg(short, long, env = "SECRETSM_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all secrets, or show one secret's keys and values
    Get {
        /// Name or ARN of the secret to show (lists all secrets when omitted)
        name: Option<String>,

        /// Print the secret string exactly as stored
        #[arg(short, long)]
        raw: bool,

        /// Sort the listing by name
        #[arg(short, long)]
        sort: bool,

        /// Secrets fetched per list call
        #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..=100))]
        max_results: Option<i32>,

        /// Show the JSON type of every value
        #[arg(short, long)]
        verbose: bool,

        /// Print only secret names, one per line
        #[arg(long, conflicts_with = "name")]
        names: bool,
    },

    /// List the keys of a secret, one per line
    Keys {
        /// Name or ARN of the secret
        name: String,
    },

    /// Set (key=value) or remove (key-) keys of a secret
    Set {
        /// Name or ARN of the secret to edit
        #[arg(long)]
        secret_name: String,

        /// Show the resulting secret without writing it
        #[arg(long)]
        dry_run: bool,

        /// Changes to apply: key=value sets a key, key- removes it
        #[arg(required = true, num_args = 1..)]
        keys: Vec<String>,
    },

    /// Show keys whose values differ between two secrets
    Compare {
        secret_a: String,
        secret_b: String,
    },

    /// Generate a shell completion script
    Completion {
        #[arg(value_enum, default_value_t = Shell::Bash)]
        shell: Shell,
    },
}

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    // Completion doesn't talk to AWS, so it doesn't need a region
    if let Commands::Completion { shell } = cli.command {
        write_completion(shell, &mut io::stdout());
        return Ok(());
    }

    let file_config = match cli.config {
        Some(ref path) => Some(
            FileConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?,
        ),
        None => None,
    };

    let max_results = match cli.command {
        Commands::Get { max_results, .. } => max_results,
        _ => None,
    };

    let config = Config::resolve(cli.region, max_results, cli.debug, file_config.as_ref())?;
    debug!("Resolved config: {:?}", config);

    let backend = create_backend(&config).await?;

    run_command(&config, backend.as_ref(), cli.command, &mut io::stdout()).await
}

/// Run a command against a backend, writing results to `out`
pub async fn run_command<W: Write>(
    config: &Config,
    backend: &dyn SecretBackend,
    command: Commands,
    out: &mut W,
) -> Result<()> {
    match command {
        Commands::Get {
            name: None,
            sort,
            names,
            ..
        } if names => {
            let mut names = listing::secret_names(backend, config.max_results)
                .await
                .context("Listing secrets error")?;
            if sort {
                names.sort();
            }
            for name in names {
                writeln!(out, "{}", name)?;
            }
        }

        Commands::Get {
            name: None, sort, ..
        } => {
            let mut secrets = listing::list_all_secrets(backend, config.max_results)
                .await
                .context("Listing secrets error")?;
            if sort {
                listing::sort_by_name(&mut secrets);
            }
            debug!("Printing {} secrets", secrets.len());
            writeln!(out, "{}", output::secret_table(&secrets))?;
        }

        Commands::Get {
            name: Some(name),
            raw: true,
            ..
        } => {
            let secret_string = payload::fetch_raw(backend, &name)
                .await
                .context("Getting secret value")?;
            writeln!(out, "{}", secret_string)?;
        }

        Commands::Get {
            name: Some(name),
            verbose,
            ..
        } => {
            let payload = payload::fetch_payload(backend, &name)
                .await
                .context("Getting secret value")?;
            if verbose {
                writeln!(out, "{}", output::payload_types(&payload))?;
            } else {
                write!(out, "{}", output::payload_lines(&payload))?;
            }
        }

        Commands::Keys { name } => {
            let keys = payload::fetch_keys(backend, &name)
                .await
                .context("Getting secret keys")?;
            for key in keys {
                writeln!(out, "{}", key)?;
            }
        }

        Commands::Set {
            secret_name,
            dry_run,
            keys,
        } => {
            let mutation = mutation::parse_mutations(&keys).context("Error parsing args")?;

            let outcome = mutation::update_secret(backend, &secret_name, &mutation, dry_run)
                .await
                .context("Error setting secret")?;

            match outcome.receipt {
                Some(receipt) => {
                    info!("Updated {} in {}", secret_name, backend.backend_type());
                    writeln!(out, "{}", output::put_summary(&secret_name, &receipt))?;
                }
                None => write!(out, "{}", output::payload_lines(&outcome.payload))?,
            }
        }

        Commands::Compare { secret_a, secret_b } => {
            let (forward, backward) = compare::compare_secrets(backend, &secret_a, &secret_b)
                .await
                .context("Failed to compare secrets")?;

            writeln!(out, "{}", output::rule('-'))?;
            write!(out, "{}", output::diff_table(&secret_a, &secret_b, &forward))?;
            write!(out, "{}", output::diff_table(&secret_b, &secret_a, &backward))?;
        }

        Commands::Completion { shell } => write_completion(shell, out),
    }

    Ok(())
}

fn write_completion(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "secretsm", out);
}

/// Create the AWS Secrets Manager backend for the resolved region
async fn create_backend(config: &Config) -> Result<Backend> {
    let client = AwsSecretsClient::new(&config.region)
        .await
        .context("Failed to create AWS Secrets Manager client")?;
    Ok(Box::new(client))
}
