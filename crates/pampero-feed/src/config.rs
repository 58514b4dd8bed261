//! Feed connection configuration.

use std::time::Duration;

/// Default exchange stream endpoint.
pub const DEFAULT_ENDPOINT: &str = "wss://stream.binance.com:9443";

/// Configuration for one symbol's feed connection.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// WebSocket endpoint of the exchange stream API.
    pub endpoint: String,
    /// First reconnect delay after a failure.
    pub backoff_base: Duration,
    /// Ceiling the reconnect delay never exceeds.
    pub backoff_ceiling: Duration,
    /// Time allowed for connect + subscribe + ack before giving up.
    pub handshake_timeout: Duration,
    /// No inbound frame of any kind within this window forces a reconnect.
    pub idle_timeout: Duration,
    /// Interval between client ping frames while connected.
    pub ping_interval: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            backoff_base: Duration::from_secs(1),
            backoff_ceiling: Duration::from_secs(30),
            handshake_timeout: Duration::from_secs(10),
            // The exchange pings every few minutes on a quiet stream; our own
            // pings every 30s keep a healthy connection inside this window.
            idle_timeout: Duration::from_secs(90),
            ping_interval: Duration::from_secs(30),
        }
    }
}

impl FeedConfig {
    /// Returns the socket URL the connection dials.
    #[must_use]
    pub fn socket_url(&self) -> String {
        format!("{}/ws", self.endpoint.trim_end_matches('/'))
    }
}
