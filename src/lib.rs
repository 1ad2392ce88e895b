pub mod cli;
pub mod commands;
pub mod errors;
pub mod form;
pub mod models;
pub mod utils;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::errors::ErrorResponse;

/// Parse the command line, set up logging and run the requested command.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the generated output
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    debug!("Starting EA builder: {:?}", cli.command);

    if let Err(err) = cli::execute(&cli) {
        if cli.json {
            println!("{}", serde_json::to_string(&ErrorResponse::from(&err))?);
            std::process::exit(1);
        }
        return Err(err.into());
    }
    Ok(())
}
