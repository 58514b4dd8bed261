//! Benchmark utilities for pampero.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use pampero_types::{StoredTick, Tick};

/// Symbols used for synthetic batches.
pub const SYMBOLS: &[&str] = &["BTCUSDT", "ETHUSDT", "SOLUSDT", "XRPUSDT"];

/// Deterministic linear congruential generator, so every benchmark run
/// folds the same batch.
#[derive(Debug)]
pub struct Lcg(u64);

impl Lcg {
    /// Creates a generator from a seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Base instant for synthetic trade times.
#[must_use]
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Builds a batch of `count` synthetic ticks: a random walk around 100,
/// spread over multiple symbols, one tick every ~200ms of trade time.
#[must_use]
pub fn synthetic_ticks(count: usize, seed: u64) -> Vec<StoredTick> {
    let mut rng = Lcg::new(seed);
    let start = base_time();
    let mut price = 100.0;

    (0..count)
        .map(|i| {
            price = (price + (rng.next_f64() - 0.5)).max(1.0);
            let quantity = 0.01 + rng.next_f64();
            let trade_time = start + TimeDelta::milliseconds(i as i64 * 200);
            let symbol = SYMBOLS[i % SYMBOLS.len()];
            StoredTick::new(
                i as i64 + 1,
                Tick::new(symbol, price, quantity, trade_time, trade_time, Some(i as i64)),
            )
        })
        .collect()
}

/// Reverses a batch so the fold sees worst-case arrival order.
#[must_use]
pub fn reversed(ticks: &[StoredTick]) -> Vec<StoredTick> {
    ticks.iter().rev().cloned().collect()
}
