//! ChivoFast CLI — terminal interface for the delivery-time toolkit.
//!
//! Exposes the dashboard's menu as subcommands: ingest a CSV of
//! historical deliveries, inspect and export the stored records, show
//! KPIs, and estimate the delivery time for a hypothetical new order.

mod commands;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// ChivoFast: delivery-time estimation from historical records
#[derive(Parser, Debug)]
#[command(name = "chivofast", version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "chivofast.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Ingest a CSV of historical deliveries into the store
    Ingest {
        /// Path to the CSV file
        file: PathBuf,
    },
    /// Show stored records
    Show {
        /// Maximum number of records to display
        #[arg(short, long, default_value = "200")]
        limit: usize,
    },
    /// Export stored records to a CSV file
    Export {
        /// Destination path
        file: PathBuf,
    },
    /// Show KPI summary of the stored records
    Kpis,
    /// Estimate the delivery time for a hypothetical new order
    Predict {
        /// Delivery zone
        #[arg(long)]
        zone: String,
        /// Order type
        #[arg(long)]
        order_type: String,
        /// Weather condition (sunny, cloudy, rainy)
        #[arg(long)]
        weather: String,
        /// Traffic level (low, medium, high)
        #[arg(long)]
        traffic: String,
        /// Print the estimate as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete every stored record
    Purge {
        /// Skip the confirmation check
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config = chivofast_core::ChivofastConfig::load(&cli.config)?;
    commands::handle_command(cli.command, &config)
}
