//! Trade tick representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single trade observation from the live feed.
///
/// Ticks are immutable once created: the ingestor builds one per accepted
/// feed message and appends it to the raw log, and nothing mutates it
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Symbol the trade executed on (e.g. "BTCUSDT").
    pub symbol: String,
    /// Execution price.
    pub price: f64,
    /// Executed quantity in base units.
    pub quantity: f64,
    /// Trade timestamp assigned by the exchange (UTC). May arrive out of
    /// order across reconnects.
    pub trade_time: DateTime<Utc>,
    /// Timestamp assigned on receipt by this process (UTC).
    pub ingest_time: DateTime<Utc>,
    /// Per-symbol trade sequence number from the feed, when the feed
    /// provides one. Used as the deduplication identity.
    pub trade_id: Option<i64>,
}

impl Tick {
    /// Creates a new tick.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        price: f64,
        quantity: f64,
        trade_time: DateTime<Utc>,
        ingest_time: DateTime<Utc>,
        trade_id: Option<i64>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            quantity,
            trade_time,
            ingest_time,
            trade_id,
        }
    }

    /// Returns the notional value of the trade (price * quantity).
    #[must_use]
    pub fn notional(&self) -> f64 {
        self.price * self.quantity
    }
}

/// A tick as read back from the raw log, together with its append sequence.
///
/// The sequence is the log's row id. It breaks trade-timestamp ties when the
/// aggregator orders ticks, so "latest" stays well-defined for trades that
/// share an exchange timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredTick {
    /// Append sequence (raw log row id), strictly increasing per append.
    pub seq: i64,
    /// The tick itself.
    pub tick: Tick,
}

impl StoredTick {
    /// Creates a stored tick from its row id and payload.
    #[must_use]
    pub const fn new(seq: i64, tick: Tick) -> Self {
        Self { seq, tick }
    }

    /// Ordering key used by the aggregator's fold: trade time first, append
    /// sequence as the tie-break.
    #[must_use]
    pub const fn order_key(&self) -> (i64, i64) {
        (self.tick.trade_time.timestamp_millis(), self.seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick_at(price: f64, quantity: f64) -> Tick {
        Tick::new("BTCUSDT", price, quantity, Utc::now(), Utc::now(), Some(1))
    }

    #[test]
    fn test_tick_notional() {
        let tick = tick_at(43_500.5, 0.25);
        assert!((tick.notional() - 10_875.125).abs() < 1e-9);
    }

    #[test]
    fn test_order_key_breaks_ties_by_sequence() {
        let now = Utc::now();
        let a = StoredTick::new(7, Tick::new("BTCUSDT", 100.0, 1.0, now, now, None));
        let b = StoredTick::new(9, Tick::new("BTCUSDT", 101.0, 1.0, now, now, None));
        assert!(a.order_key() < b.order_key());
    }

    #[test]
    fn test_tick_serde_round_trip() {
        let tick = tick_at(95.0, 2.0);
        let json = serde_json::to_string(&tick).unwrap();
        let back: Tick = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tick);
    }
}
