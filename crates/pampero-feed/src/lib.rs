//! Live trade feed ingestion for the pampero pipeline.
//!
//! One [`SymbolFeed`] per tracked symbol owns a WebSocket connection to the
//! exchange's trade stream:
//!
//! - [`FeedConfig`] - Endpoint, backoff, and liveness settings
//! - [`Backoff`] - Capped exponential reconnect delay state
//! - [`SymbolFeed`] - The connect/subscribe/stream/backoff task
//! - [`TickHandler`] - Delivery seam for accepted ticks
//! - [`FeedCounters`] - Per-connection diagnostics
//! - [`message`] - The parse-or-reject wire boundary

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/veleta-labs/pampero/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod backoff;
mod config;
mod connection;
mod counters;
pub mod message;

pub use backoff::Backoff;
pub use config::{DEFAULT_ENDPOINT, FeedConfig};
pub use connection::{FeedError, SymbolFeed, TickHandler};
pub use counters::{FeedCounters, FeedCountersSnapshot};
