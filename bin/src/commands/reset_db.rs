//! Guarded database wipe command.

use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use inquire::Text;

use pampero_lib::MarketStore;

/// Execute the reset-db command.
pub(crate) async fn reset_db(db_path: PathBuf, yes: bool) -> Result<()> {
    ensure!(
        db_path.exists(),
        "No database at {}",
        db_path.display()
    );

    if !yes {
        let prompt = format!(
            "This empties all ticks, candles and forecasts in {}. Type 'yes' to confirm:",
            db_path.display()
        );
        let answer = Text::new(&prompt).prompt().context("Prompt failed")?;
        if answer.trim() != "yes" {
            println!("Aborted.");
            return Ok(());
        }
    }

    let store = MarketStore::open(&db_path)
        .await
        .context("Failed to open store")?;
    store.reset().await.context("Reset failed")?;
    println!("Database reset.");
    Ok(())
}
