//! Runtime orchestration for the pampero market data pipeline.
//!
//! This crate wires the other crates into a running service:
//!
//! - [`PipelineConfig`] - Symbols, store path, cadences, retry policy
//! - [`StoreSink`] - Store-backed tick sink with bounded append retry
//! - [`Aggregator`] - The periodic fold-and-upsert scheduler
//! - [`Pipeline`] - Task spawning, status heartbeat, graceful shutdown

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/veleta-labs/pampero/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod config;
mod pipeline;
mod sink;

pub use aggregator::Aggregator;
pub use config::{DEFAULT_SYMBOLS, PipelineConfig};
pub use pipeline::Pipeline;
pub use sink::{SinkCounters, SinkCountersSnapshot, StoreSink};
