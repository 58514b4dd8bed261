//! Pipeline configuration.

use std::path::PathBuf;
use std::time::Duration;

use pampero_feed::FeedConfig;

/// Symbols tracked when none are configured.
pub const DEFAULT_SYMBOLS: &[&str] = &["BTCUSDT", "ETHUSDT", "SOLUSDT", "XRPUSDT"];

/// Configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Symbols to track, one feed connection each.
    pub symbols: Vec<String>,
    /// Path of the SQLite database file.
    pub db_path: PathBuf,
    /// Feed connection settings shared by every symbol's task.
    pub feed: FeedConfig,
    /// Interval between aggregation passes.
    pub aggregate_interval: Duration,
    /// Maximum ticks one aggregation query page reads.
    pub batch_limit: i64,
    /// Total append attempts per tick before it is dropped and counted.
    pub append_attempts: u32,
    /// First delay between append attempts; doubles per retry.
    pub append_retry_base: Duration,
    /// Interval between status heartbeat log lines.
    pub heartbeat_interval: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(ToString::to_string).collect(),
            db_path: PathBuf::from("pampero.db"),
            feed: FeedConfig::default(),
            aggregate_interval: Duration::from_secs(10),
            batch_limit: 10_000,
            append_attempts: 3,
            append_retry_base: Duration::from_millis(200),
            heartbeat_interval: Duration::from_secs(60),
        }
    }
}

impl PipelineConfig {
    /// Sets the tracked symbols.
    #[must_use]
    pub fn with_symbols(mut self, symbols: Vec<String>) -> Self {
        self.symbols = symbols;
        self
    }

    /// Sets the database path.
    #[must_use]
    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }

    /// Sets the feed endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.feed.endpoint = endpoint.into();
        self
    }

    /// Sets the interval between aggregation passes.
    #[must_use]
    pub const fn with_aggregate_interval(mut self, interval: Duration) -> Self {
        self.aggregate_interval = interval;
        self
    }
}
