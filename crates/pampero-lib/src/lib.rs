//! Streaming market data pipeline: live trade ticks in, one-minute OHLCV
//! candles out.
//!
//! This is a facade crate that re-exports functionality from the pampero
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use pampero_lib::{Pipeline, PipelineConfig};
//! use tokio::sync::watch;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::default()
//!         .with_symbols(vec!["BTCUSDT".to_string()])
//!         .with_db_path("pampero.db");
//!
//!     let (shutdown_tx, shutdown_rx) = watch::channel(false);
//!     tokio::spawn(async move {
//!         tokio::signal::ctrl_c().await.ok();
//!         shutdown_tx.send(true).ok();
//!     });
//!
//!     Pipeline::new(config).run(shutdown_rx).await?;
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/veleta-labs/pampero/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use pampero_types::*;

// Re-export the feed
pub use pampero_feed::{
    Backoff, DEFAULT_ENDPOINT, FeedConfig, FeedCounters, FeedCountersSnapshot, FeedError,
    SymbolFeed, TickHandler, message,
};

// Re-export aggregation
pub use pampero_aggregate::{Candle, CandleUpdate, bucket_start, fill_forward, fold_ticks};

// Re-export the store
pub use pampero_store::{MarketStore, StoreError, SymbolStatus};

// Re-export the pipeline runtime
pub use pampero_pipeline::{
    Aggregator, DEFAULT_SYMBOLS, Pipeline, PipelineConfig, SinkCounters, SinkCountersSnapshot,
    StoreSink,
};
