use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::commands;
use crate::errors::AppError;
use crate::models::strategy::StrategyKind;
use crate::utils::clipboard::SystemClipboard;

#[derive(Parser, Debug)]
#[command(name = "ea-builder")]
#[command(about = "Generate MetaTrader 5 Expert Advisor source from a parameter set", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// JSON parameter file (see `defaults` for the layout)
    #[arg(short, long, global = true)]
    pub params: Option<PathBuf>,

    /// Active strategy: ma_crossover, rsi or macd (overrides the file)
    #[arg(short, long, global = true)]
    pub strategy: Option<StrategyKind>,

    /// Field edit as key=value, e.g. `ma.fast=5` or `lot_size=0.2`. Repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE", global = true)]
    pub assignments: Vec<String>,

    /// Machine-readable output, including errors
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the generated source
    Preview,

    /// Copy the generated source to the clipboard
    Copy,

    /// Save the generated source as <ea_name>.mq5
    Download {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Print the default parameter set as JSON
    Defaults,

    /// List strategies, timeframes, MA methods and applied prices
    Options,

    /// Report suspicious parameter combinations without changing output
    Lint,
}

/// Run one subcommand, writing its result to stdout.
pub fn execute(cli: &Cli) -> Result<(), AppError> {
    match &cli.command {
        Command::Defaults => {
            println!("{}", commands::defaults()?);
            return Ok(());
        }
        Command::Options => {
            print!("{}", commands::options());
            return Ok(());
        }
        _ => {}
    }

    let mut form = commands::load_form(cli.params.as_deref(), cli.strategy, &cli.assignments)?;

    match &cli.command {
        Command::Preview => {
            let file = commands::preview(&mut form);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&file)?);
            } else {
                print!("{}", file.code);
            }
        }
        Command::Copy => {
            commands::copy(&mut form, &mut SystemClipboard::new())?;
            println!("Code copied to clipboard.");
        }
        Command::Download { out_dir } => {
            let path = commands::download(&mut form, out_dir)?;
            if cli.json {
                println!("{}", serde_json::json!({ "path": path.display().to_string() }));
            } else {
                println!("{}", path.display());
            }
        }
        Command::Lint => {
            let warnings = commands::lint(&form);
            if cli.json {
                let items: Vec<_> = warnings
                    .iter()
                    .map(|w| serde_json::json!({ "category": w.category.to_string(), "message": w.message }))
                    .collect();
                println!("{}", serde_json::Value::Array(items));
            } else if warnings.is_empty() {
                println!("No warnings.");
            } else {
                for w in &warnings {
                    println!("{}", w);
                }
            }
            info!("Lint finished with {} warning(s)", warnings.len());
        }
        Command::Defaults | Command::Options => {}
    }

    Ok(())
}
