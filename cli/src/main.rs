//! tokengate - operator entry point
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tokengate check` | Validate configuration and print a redacted summary |
//! | `tokengate self-test` | Run signup, login and refresh against in-memory stores |

mod commands;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tg_shared::config::{collect_settings, validate, AppConfig, ConfigErrors, LoggingConfig};

/// Command line interface for tokengate
#[derive(Parser, Debug)]
#[command(name = "tokengate")]
#[command(about = "Credential verification and token issuance engine")]
#[command(version)]
struct Cli {
    /// Load settings from this file instead of `.env`
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate configuration and report every violation
    Check {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Exercise signup, login and refresh with the configured secrets
    SelfTest,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    load_env_file(cli.env_file.as_deref())?;
    let validated = validate(&collect_settings(std::env::vars()));

    let logging = match &validated {
        Ok(config) => config.logging.clone(),
        Err(_) => LoggingConfig::default(),
    };
    logging::init(&logging)?;

    match cli.command {
        Command::Check { json } => commands::check::run(validated, json),
        Command::SelfTest => {
            let config = match validated {
                Ok(config) => install(config)?,
                Err(errors) => return Ok(reject(&errors)),
            };
            commands::self_test::run(config).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_env_file(path: Option<&std::path::Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
        }
        None => {
            // A missing .env is normal outside development
            dotenvy::dotenv().ok();
        }
    }
    Ok(())
}

pub(crate) fn install(config: AppConfig) -> anyhow::Result<&'static AppConfig> {
    Ok(config.install()?)
}

pub(crate) fn reject(errors: &ConfigErrors) -> ExitCode {
    tracing::error!(violations = errors.len(), "Configuration rejected");
    eprintln!("{}", errors);
    ExitCode::FAILURE
}
