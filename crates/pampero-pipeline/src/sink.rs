//! Store-backed tick sink with bounded append retry.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, warn};

use pampero_feed::TickHandler;
use pampero_store::MarketStore;
use pampero_types::Tick;

/// Monotonic counters for the append path.
///
/// Same discipline as the feed counters: the sink increments, the status
/// heartbeat reads snapshots through a shared `Arc`.
#[derive(Debug, Default)]
pub struct SinkCounters {
    appended: AtomicU64,
    duplicates: AtomicU64,
    dropped: AtomicU64,
}

/// Point-in-time copy of [`SinkCounters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SinkCountersSnapshot {
    /// Ticks appended to the raw log.
    pub appended: u64,
    /// Ticks suppressed by the `(symbol, trade_id)` dedup identity.
    pub duplicates: u64,
    /// Ticks lost after exhausting the append retries.
    pub dropped: u64,
}

impl SinkCounters {
    /// Returns a point-in-time copy of all counters.
    #[must_use]
    pub fn snapshot(&self) -> SinkCountersSnapshot {
        SinkCountersSnapshot {
            appended: self.appended.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Persists accepted ticks into the raw log.
///
/// A failed append is retried with a short doubling delay, independent of
/// the feed's reconnect backoff. When the attempts are exhausted the tick
/// is dropped and counted as loss: bounded memory, no retry queue. The
/// calling feed task keeps streaming either way.
#[derive(Debug)]
pub struct StoreSink {
    store: MarketStore,
    attempts: u32,
    retry_base: Duration,
    counters: Arc<SinkCounters>,
}

impl StoreSink {
    /// Creates a sink over the store with the given retry policy.
    #[must_use]
    pub fn new(store: MarketStore, attempts: u32, retry_base: Duration) -> Self {
        Self {
            store,
            attempts: attempts.max(1),
            retry_base,
            counters: Arc::new(SinkCounters::default()),
        }
    }

    /// Shared handle to this sink's counters.
    #[must_use]
    pub fn counters(&self) -> Arc<SinkCounters> {
        Arc::clone(&self.counters)
    }
}

#[async_trait]
impl TickHandler for StoreSink {
    async fn on_tick(&self, tick: Tick) {
        for attempt in 0..self.attempts {
            match self.store.append_tick(&tick).await {
                Ok(true) => {
                    self.counters.appended.fetch_add(1, Ordering::Relaxed);
                    return;
                }
                Ok(false) => {
                    debug!(
                        symbol = %tick.symbol,
                        trade_id = ?tick.trade_id,
                        "redelivered tick suppressed"
                    );
                    self.counters.duplicates.fetch_add(1, Ordering::Relaxed);
                    return;
                }
                Err(error) => {
                    warn!(
                        symbol = %tick.symbol,
                        attempt = attempt + 1,
                        error = %error,
                        "tick append failed"
                    );
                    if attempt + 1 < self.attempts {
                        sleep(self.retry_base.saturating_mul(1 << attempt.min(8))).await;
                    }
                }
            }
        }
        self.counters.dropped.fetch_add(1, Ordering::Relaxed);
        warn!(symbol = %tick.symbol, "tick dropped after exhausting append retries");
    }
}
