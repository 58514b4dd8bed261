//! Store freshness readout command.

use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use chrono::Utc;

use pampero_lib::{DEFAULT_SYMBOLS, MarketStore};

use crate::display;

/// Execute the status command.
pub(crate) async fn status(db_path: PathBuf, symbols: Vec<String>) -> Result<()> {
    ensure!(
        db_path.exists(),
        "No database at {} (run `pampero run` first)",
        db_path.display()
    );
    let store = MarketStore::open(&db_path)
        .await
        .context("Failed to open store")?;

    let symbols: Vec<String> = if symbols.is_empty() {
        DEFAULT_SYMBOLS.iter().map(ToString::to_string).collect()
    } else {
        symbols
            .iter()
            .map(|symbol| symbol.trim().to_uppercase())
            .collect()
    };

    println!("Database: {}", db_path.display());
    let now = Utc::now();
    for symbol in &symbols {
        let status = store
            .symbol_status(symbol)
            .await
            .with_context(|| format!("Failed to read status for {symbol}"))?;
        display::print_symbol_status(&status, now);
    }

    let lag = store.cursor_lag().await.context("Failed to read cursor")?;
    println!("Unfolded ticks: {lag}");
    Ok(())
}
