//! CLI interface for perp-watch
//!
//! Provides subcommands for:
//! - `run`: Start the polling monitor
//! - `check`: Run a single fetch-and-evaluate cycle
//! - `config`: Show the effective configuration

mod check;
mod run;

pub use check::CheckArgs;
pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "perp-watch")]
#[command(about = "Market signal monitor for Binance USD-M perpetual futures")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the polling monitor
    Run(RunArgs),
    /// Run a single fetch-and-evaluate cycle and print the result
    Check(CheckArgs),
    /// Show the effective configuration
    Config,
}
