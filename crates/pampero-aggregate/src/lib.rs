//! Bucket aggregation for the pampero market data pipeline.
//!
//! This crate reduces raw trade ticks into one-minute OHLCV candles:
//!
//! - [`Candle`] - One-minute OHLCV bucket for a symbol
//! - [`CandleUpdate`] - One pass's folded contribution to a bucket
//! - [`fold_ticks`] - The deterministic fold over a tick batch
//! - [`fill_forward`] - Forward-filling of empty buckets on the read path

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/veleta-labs/pampero/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod candle;
mod fill;
mod fold;

pub use candle::{Candle, CandleUpdate};
pub use fill::fill_forward;
pub use fold::{bucket_start, fold_ticks};
