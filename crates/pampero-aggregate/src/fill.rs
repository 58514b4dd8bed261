//! Forward-filling of empty buckets.

use chrono::{DateTime, TimeDelta, Utc};

use crate::{Candle, bucket_start};

/// Expands a sparse candle series into a continuous minute series.
///
/// `candles` must be ascending by bucket time and belong to a single
/// symbol. Every minute in `[from, to]` (endpoints truncated to their
/// buckets) without a real candle gets a synthetic flat one: all four
/// prices carry the previous close, volume and trade count are zero.
/// Minutes before the first real candle are left out, since there is no
/// close to carry yet.
#[must_use]
pub fn fill_forward(candles: &[Candle], from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<Candle> {
    let mut series: Vec<Candle> = Vec::new();
    let mut idx = 0;

    let mut minute = bucket_start(from);
    let last = bucket_start(to);
    while minute <= last {
        while idx < candles.len() && candles[idx].bucket_time < minute {
            idx += 1;
        }
        if idx < candles.len() && candles[idx].bucket_time == minute {
            series.push(candles[idx].clone());
            idx += 1;
        } else if let Some(prev) = series.last() {
            // Synthetic candles chain: their close carries forward too.
            let filled = Candle::new(
                minute,
                prev.symbol.clone(),
                prev.close,
                prev.close,
                prev.close,
                prev.close,
                0.0,
                0,
                0.0,
            );
            series.push(filled);
        }
        minute += TimeDelta::minutes(1);
    }

    series
}
