//! pampero CLI - Streaming crypto tick-to-candle pipeline.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

#[derive(Parser)]
#[command(name = "pampero")]
#[command(about = "Streaming crypto market data pipeline", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Database file path. Defaults to the platform data directory.
    #[arg(long, global = true, env = "PAMPERO_DB")]
    db: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the ingestion and aggregation pipeline
    Run {
        /// Symbols to track (e.g. BTCUSDT,ETHUSDT)
        #[arg(short, long, env = "PAMPERO_SYMBOLS", value_delimiter = ',')]
        symbols: Vec<String>,

        /// WebSocket endpoint of the exchange stream API
        #[arg(long, env = "PAMPERO_ENDPOINT")]
        endpoint: Option<String>,

        /// Seconds between aggregation passes
        #[arg(long, default_value = "10")]
        aggregate_every: u64,
    },

    /// Show per-symbol freshness of the store
    Status {
        /// Symbols to report (defaults to the tracked set)
        #[arg(short, long, value_delimiter = ',')]
        symbols: Vec<String>,
    },

    /// Empty the tick log, candle table, forecast log and cursor
    ResetDb {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Initializes tracing; `RUST_LOG` overrides the verbosity flag.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Resolves the database path: the flag/env wins, otherwise the platform
/// data directory.
fn resolve_db_path(db: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = db {
        return Ok(path);
    }
    let dirs = directories::ProjectDirs::from("com", "veleta-labs", "pampero")
        .context("Could not determine the platform data directory; pass --db")?;
    Ok(dirs.data_dir().join("pampero.db"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let db_path = resolve_db_path(cli.db)?;

    match command {
        Commands::Run {
            symbols,
            endpoint,
            aggregate_every,
        } => commands::run::run(db_path, symbols, endpoint, aggregate_every).await,
        Commands::Status { symbols } => commands::status::status(db_path, symbols).await,
        Commands::ResetDb { yes } => commands::reset_db::reset_db(db_path, yes).await,
    }
}
