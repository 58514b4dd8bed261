//! Deterministic tick-to-bucket folding.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use pampero_types::StoredTick;

use crate::CandleUpdate;

/// Truncates a timestamp to the start of its one-minute bucket.
#[must_use]
pub fn bucket_start(ts: DateTime<Utc>) -> DateTime<Utc> {
    let millis = ts.timestamp_millis();
    DateTime::from_timestamp_millis(millis - millis.rem_euclid(60_000)).unwrap_or(ts)
}

/// Folds a batch of stored ticks into per-bucket candle updates.
///
/// Ticks are ordered by `(trade_time, append sequence)` before folding, so
/// the same batch produces the same updates for any physical arrival order.
/// A tick's bucket is its trade time truncated to the minute; ticks landing
/// in a minute older than others in the batch still fold into their own
/// bucket. Updates come back sorted by `(bucket_time, symbol)`.
#[must_use]
pub fn fold_ticks(ticks: &[StoredTick]) -> Vec<CandleUpdate> {
    let mut ordered: Vec<&StoredTick> = ticks.iter().collect();
    ordered.sort_by_key(|stored| stored.order_key());

    let mut buckets: BTreeMap<(DateTime<Utc>, String), CandleBuilder> = BTreeMap::new();
    for stored in ordered {
        let key = (
            bucket_start(stored.tick.trade_time),
            stored.tick.symbol.clone(),
        );
        buckets
            .entry(key)
            .and_modify(|builder| builder.update(stored))
            .or_insert_with(|| CandleBuilder::new(stored));
    }

    buckets
        .into_iter()
        .map(|((bucket_time, symbol), builder)| builder.finish(bucket_time, symbol))
        .collect()
}

/// Builder for one bucket's contribution.
///
/// Relies on ticks being fed in ascending `(trade_time, seq)` order: the
/// incoming tick is always the latest seen for this bucket, so assigning
/// `close` unconditionally is correct.
#[derive(Debug)]
struct CandleBuilder {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    trade_count: i64,
    close_time: DateTime<Utc>,
    close_seq: i64,
}

impl CandleBuilder {
    /// Creates a builder from the bucket's first tick.
    fn new(stored: &StoredTick) -> Self {
        let price = stored.tick.price;
        Self {
            open: price,
            high: price,
            low: price,
            close: price,
            volume: stored.tick.quantity,
            trade_count: 1,
            close_time: stored.tick.trade_time,
            close_seq: stored.seq,
        }
    }

    /// Updates the builder with the next tick in fold order.
    fn update(&mut self, stored: &StoredTick) {
        let price = stored.tick.price;
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
        self.close_time = stored.tick.trade_time;
        self.close_seq = stored.seq;
        self.volume += stored.tick.quantity;
        self.trade_count += 1;
    }

    /// Finishes building and returns the bucket update.
    fn finish(self, bucket_time: DateTime<Utc>, symbol: String) -> CandleUpdate {
        CandleUpdate {
            bucket_time,
            symbol,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
            trade_count: self.trade_count,
            close_time: self.close_time,
            close_seq: self.close_seq,
        }
    }
}
