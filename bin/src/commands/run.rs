//! Pipeline run command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::info;

use pampero_lib::{Pipeline, PipelineConfig};

/// Execute the run command: start the pipeline and block until Ctrl-C.
pub(crate) async fn run(
    db_path: PathBuf,
    symbols: Vec<String>,
    endpoint: Option<String>,
    aggregate_every: u64,
) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut config = PipelineConfig::default()
        .with_db_path(db_path)
        .with_aggregate_interval(Duration::from_secs(aggregate_every.max(1)));
    if !symbols.is_empty() {
        config = config.with_symbols(
            symbols
                .iter()
                .map(|symbol| symbol.trim().to_uppercase())
                .collect(),
        );
    }
    if let Some(endpoint) = endpoint {
        config = config.with_endpoint(endpoint);
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            let _ = shutdown_tx.send(true);
        }
    });

    Pipeline::new(config)
        .run(shutdown_rx)
        .await
        .context("Pipeline failed")
}
