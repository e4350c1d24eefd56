//! # GreenPrint CLI Module
//!
//! This module implements the CLI interface for GreenPrint.
//!
//! ## Available Commands
//!
//! - `serve` - Start the HTTP server
//! - `countries` - List countries recognized by the factor table
//! - `activities` - List activity keys, labels and categories
//! - `assess` - Run a one-shot assessment from an inputs file
//! - `report` - Write the plain-text report for an inputs file

mod commands;

use crate::config::AppConfig;
use clap::{Parser, Subcommand};
use greenprint_core::GreenprintError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// GreenPrint - Carbon Footprint Assessment
///
/// Multiplies monthly consumption quantities by country-specific emission
/// factors and compares the total against per-capita averages.
/// All figures are kilograms of CO₂ per month.
#[derive(Parser, Debug)]
#[command(name = "greenprint")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the emission-factor table (CSV)
    #[arg(short = 'F', long, global = true)]
    pub factors: Option<PathBuf>,

    /// Path to the per-capita averages table (CSV)
    #[arg(short = 'A', long, global = true)]
    pub averages: Option<PathBuf>,

    /// Path to the app config file (default: greenprint.toml if present)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List countries recognized by the factor table
    Countries,

    /// List activity keys, labels and categories
    Activities,

    /// Run a one-shot assessment from an inputs file
    Assess {
        /// Country to take emission factors from (overrides the inputs file)
        #[arg(short, long)]
        country: Option<String>,

        /// TOML inputs file with a [quantities] table of activity = amount
        #[arg(short, long)]
        inputs: PathBuf,

        /// Number of top-emitting activities to show
        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// Write the plain-text report for an inputs file
    Report {
        /// Country to take emission factors from (overrides the inputs file)
        #[arg(short, long)]
        country: Option<String>,

        /// TOML inputs file with a [quantities] table of activity = amount
        #[arg(short, long)]
        inputs: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Number of top-emitting activities to include
        #[arg(short, long, default_value = "10")]
        top: usize,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), GreenprintError> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let factors_path = config.factors_path(cli.factors.as_ref());
    let averages_path = config.averages_path(cli.averages.as_ref());
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            let host = config.host(host.as_deref());
            let port = config.port(port);
            cmd_serve(&factors_path, &averages_path, &host, port).await
        }
        Some(Commands::Countries) => cmd_countries(&factors_path, json_mode),
        Some(Commands::Activities) => cmd_activities(json_mode),
        Some(Commands::Assess {
            country,
            inputs,
            top,
        }) => cmd_assess(
            &factors_path,
            &averages_path,
            json_mode,
            country.as_deref(),
            &inputs,
            top,
        ),
        Some(Commands::Report {
            country,
            inputs,
            output,
            top,
        }) => cmd_report(
            &factors_path,
            &averages_path,
            country.as_deref(),
            &inputs,
            &output,
            top,
        ),
        None => {
            // No subcommand - list countries by default
            cmd_countries(&factors_path, json_mode)
        }
    }
}
