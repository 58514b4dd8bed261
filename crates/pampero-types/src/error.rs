//! Error types for pampero.

use thiserror::Error;

/// Result type alias for pampero operations.
pub type Result<T> = std::result::Result<T, PamperoError>;

/// Errors that can occur while ingesting, folding, or persisting ticks.
#[derive(Error, Debug)]
pub enum PamperoError {
    /// Live feed failure (handshake, subscription, transport).
    #[error("Feed error: {0}")]
    Feed(String),

    /// Inbound message failed the parse-or-reject boundary.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Store read or write failed.
    #[error("Store error: {0}")]
    Store(String),

    /// Invalid configuration value.
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
