//! Candle (bucket aggregate) data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One-minute OHLCV candle for a single symbol.
///
/// Keyed by `(bucket_time, symbol)` in the store. `sentiment_score` is
/// populated by the external sentiment collaborator and defaults to neutral
/// zero; the aggregation path never writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bucket start time (trade time truncated to the minute, UTC).
    pub bucket_time: DateTime<Utc>,
    /// Symbol the bucket aggregates (e.g. "BTCUSDT").
    pub symbol: String,
    /// Price of the earliest tick folded into the bucket.
    pub open: f64,
    /// Highest price in the bucket.
    pub high: f64,
    /// Lowest price in the bucket.
    pub low: f64,
    /// Price of the latest tick folded into the bucket.
    pub close: f64,
    /// Sum of traded quantities.
    pub volume: f64,
    /// Number of ticks folded into the bucket.
    pub trade_count: i64,
    /// Externally-populated sentiment score, neutral zero until written.
    pub sentiment_score: f64,
}

impl Candle {
    /// Creates a new candle.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bucket_time: DateTime<Utc>,
        symbol: impl Into<String>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        trade_count: i64,
        sentiment_score: f64,
    ) -> Self {
        Self {
            bucket_time,
            symbol: symbol.into(),
            open,
            high,
            low,
            close,
            volume,
            trade_count,
            sentiment_score,
        }
    }

    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// True for forward-filled candles that contain no real trades.
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        self.trade_count == 0
    }
}

/// One aggregation pass's folded contribution to a single candle key.
///
/// Produced by [`fold_ticks`](crate::fold_ticks) and merged into the stored
/// row by the store's upsert: high/low/volume/trade_count combine
/// additively, `close` wins only if `(close_time, close_seq)` is later than
/// what the row already holds, and `open` is fixed by whichever pass
/// created the row.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleUpdate {
    /// Bucket start time (UTC).
    pub bucket_time: DateTime<Utc>,
    /// Symbol the bucket aggregates.
    pub symbol: String,
    /// Price of the earliest tick in this pass's contribution.
    pub open: f64,
    /// Highest price in this pass's contribution.
    pub high: f64,
    /// Lowest price in this pass's contribution.
    pub low: f64,
    /// Price of the latest tick in this pass's contribution.
    pub close: f64,
    /// Sum of quantities in this pass's contribution.
    pub volume: f64,
    /// Number of ticks in this pass's contribution.
    pub trade_count: i64,
    /// Trade time of the tick that set `close`.
    pub close_time: DateTime<Utc>,
    /// Append sequence of the tick that set `close`.
    pub close_seq: i64,
}
