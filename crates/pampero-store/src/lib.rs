//! SQLite persistence for the pampero market data pipeline.
//!
//! Everything that touches the database lives behind [`MarketStore`]:
//!
//! - [`MarketStore`] - Pooled SQLite handle with schema bootstrap
//! - [`StoreError`] - Persistence failures
//! - [`SymbolStatus`] - Per-symbol freshness readout for the status surface

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/veleta-labs/pampero/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod schema;
mod store;

pub use store::{MarketStore, StoreError, SymbolStatus};
