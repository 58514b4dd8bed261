//! The periodic aggregation scheduler.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use pampero_aggregate::fold_ticks;
use pampero_store::{MarketStore, StoreError};

/// Folds newly appended ticks into candles on a fixed interval.
///
/// Passes run inline in the scheduler task, so they can never overlap, and
/// missed interval ticks are skipped rather than bursted; together that is
/// the skip-if-already-running discipline. A failed pass leaves the cursor
/// where it was and is retried whole on the next interval; nothing is lost
/// because the ticks stay in the raw log.
#[derive(Debug)]
pub struct Aggregator {
    store: MarketStore,
    batch_limit: i64,
}

impl Aggregator {
    /// Creates an aggregator reading pages of at most `batch_limit` ticks.
    #[must_use]
    pub fn new(store: MarketStore, batch_limit: i64) -> Self {
        Self {
            store,
            batch_limit: batch_limit.max(1),
        }
    }

    /// Runs passes every `interval` until shutdown, then drains once more
    /// so no already-persisted tick is left unfolded.
    pub async fn run(&self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(error) = self.run_pass().await {
                        warn!(error = %error, "aggregation pass failed; will retry next interval");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        match self.run_pass().await {
            Ok(folded) => debug!(folded, "final aggregation pass drained"),
            Err(error) => warn!(error = %error, "final aggregation pass failed"),
        }
    }

    /// Runs one pass: pages through ticks past the cursor, folds each page,
    /// and commits its upserts together with the cursor advance.
    ///
    /// Returns the number of ticks folded.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if a read or the transactional apply fails.
    /// Already-committed pages stay committed; the rest is picked up by the
    /// next pass.
    pub async fn run_pass(&self) -> Result<u64, StoreError> {
        let mut folded: u64 = 0;
        loop {
            let cursor = self.store.aggregation_cursor().await?;
            let batch = self.store.ticks_after(cursor, self.batch_limit).await?;
            let Some(last) = batch.last() else {
                break;
            };
            let next_cursor = last.seq;
            let updates = fold_ticks(&batch);
            self.store.apply_aggregation(&updates, next_cursor).await?;
            folded += batch.len() as u64;
            if (batch.len() as i64) < self.batch_limit {
                break;
            }
        }
        if folded > 0 {
            debug!(folded, "aggregation pass complete");
        }
        Ok(folded)
    }
}
