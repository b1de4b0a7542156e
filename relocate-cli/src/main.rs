use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod live_rates;
mod output;

use commands::{CompareArgs, StagesArgs, TaxArgs};
use config::{Config, Overrides};
use output::OutputFormat;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Take-home pay, savings and migration-cost recovery for doctors moving
/// from India.
///
/// Reads salary bands, tax rules, cost of living and migration costs from a
/// data directory of CSV files.
#[derive(Debug, Parser)]
#[command(name = "relocate", version, about)]
struct Cli {
    /// Directory holding the CSV tables.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Skip live exchange rates and use the bundled ones.
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Tax breakdown for one gross salary.
    Tax(TaxArgs),
    /// Compare take-home pay and savings across destinations.
    Compare(CompareArgs),
    /// List the career stages known for a country.
    Stages(StagesArgs),
    /// Check the data directory for inconsistencies.
    Validate,
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info` so normal runs are quiet.
/// * Writes to stderr so stdout carries only the report.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let overrides = Overrides {
        data_dir: cli.data_dir,
        format: cli.format,
        offline: cli.offline,
    };
    let config = Config::load(cli.config.as_deref(), &overrides)
        .context("failed to load configuration")?;
    debug!(?config, "resolved configuration");

    let report = match cli.command {
        Command::Tax(args) => commands::tax(&config, args)?,
        Command::Compare(args) => commands::compare(&config, args).await?,
        Command::Stages(args) => commands::stages(&config, args)?,
        Command::Validate => commands::validate(&config)?,
    };
    println!("{}", report.trim_end());

    Ok(())
}
