//! Core types for the pampero market data pipeline.
//!
//! This crate provides the fundamental data structures used throughout
//! pampero:
//!
//! - [`Tick`] - A single trade observation from the live feed
//! - [`StoredTick`] - A tick read back from the raw log with its append sequence
//! - [`Forecast`] - A forecast log record written by the forecasting collaborator
//! - [`PamperoError`] - The shared error type

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/veleta-labs/pampero/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod forecast;
mod tick;

pub use error::{PamperoError, Result};
pub use forecast::Forecast;
pub use tick::{StoredTick, Tick};
