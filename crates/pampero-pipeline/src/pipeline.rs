//! Pipeline orchestration.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use pampero_feed::{FeedCounters, SymbolFeed, TickHandler};
use pampero_store::MarketStore;
use pampero_types::{PamperoError, Result};

use crate::{Aggregator, PipelineConfig, SinkCounters, StoreSink};

/// The assembled pipeline: per-symbol ingest tasks, the aggregation
/// scheduler, and a status heartbeat, all tied to one shutdown signal.
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Creates a pipeline from its configuration.
    #[must_use]
    pub const fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Runs until the shutdown signal flips to `true`.
    ///
    /// Every feed task closes its subscription cleanly on shutdown and the
    /// aggregator drains the raw log once more before this returns. Errors
    /// inside a symbol's task stay inside it (the task reconnects forever);
    /// only failing to open the store is fatal here.
    ///
    /// # Errors
    ///
    /// Returns [`PamperoError::Store`] if the database cannot be opened.
    pub async fn run(self, shutdown: watch::Receiver<bool>) -> Result<()> {
        if self.config.symbols.is_empty() {
            return Err(PamperoError::Config("no symbols configured".to_string()));
        }

        let store = MarketStore::open(&self.config.db_path)
            .await
            .map_err(PamperoError::from)?;
        info!(
            db = %self.config.db_path.display(),
            symbols = ?self.config.symbols,
            "pipeline starting"
        );

        let sink = Arc::new(StoreSink::new(
            store.clone(),
            self.config.append_attempts,
            self.config.append_retry_base,
        ));
        let sink_counters = sink.counters();
        let handler: Arc<dyn TickHandler> = sink;

        let mut tasks: Vec<JoinHandle<()>> = Vec::new();
        let mut feed_counters: Vec<(String, Arc<FeedCounters>)> = Vec::new();
        for symbol in &self.config.symbols {
            let feed = SymbolFeed::new(self.config.feed.clone(), symbol.clone());
            feed_counters.push((symbol.clone(), feed.counters()));
            let feed_handler = Arc::clone(&handler);
            let feed_shutdown = shutdown.clone();
            tasks.push(tokio::spawn(async move {
                feed.run(feed_handler, feed_shutdown).await;
            }));
        }

        let aggregator = Aggregator::new(store.clone(), self.config.batch_limit);
        let aggregate_interval = self.config.aggregate_interval;
        let aggregator_shutdown = shutdown.clone();
        tasks.push(tokio::spawn(async move {
            aggregator.run(aggregate_interval, aggregator_shutdown).await;
        }));

        tasks.push(tokio::spawn(heartbeat(
            store.clone(),
            feed_counters,
            sink_counters,
            self.config.heartbeat_interval,
            shutdown,
        )));

        for task in tasks {
            if let Err(error) = task.await {
                warn!(error = %error, "pipeline task panicked");
            }
        }
        store.close().await;
        info!("pipeline stopped");
        Ok(())
    }
}

/// Logs a periodic status line per symbol until shutdown.
async fn heartbeat(
    store: MarketStore,
    feeds: Vec<(String, Arc<FeedCounters>)>,
    sink: Arc<SinkCounters>,
    interval: std::time::Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // Skip the interval's immediate first tick.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let appends = sink.snapshot();
                let lag = store.cursor_lag().await.unwrap_or(-1);
                for (symbol, counters) in &feeds {
                    let feed = counters.snapshot();
                    info!(
                        symbol = %symbol,
                        accepted = feed.accepted,
                        rejected = feed.rejected,
                        connects = feed.connects,
                        disconnects = feed.disconnects,
                        "feed status"
                    );
                }
                info!(
                    appended = appends.appended,
                    duplicates = appends.duplicates,
                    dropped = appends.dropped,
                    cursor_lag = lag,
                    "store status"
                );
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use futures::{SinkExt, StreamExt};
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::net::TcpListener;
    use tokio::time::{sleep, timeout};
    use tokio_tungstenite::accept_async;
    use tokio_tungstenite::tungstenite::Message;

    use pampero_feed::FeedConfig;

    const ACK: &str = r#"{"result":null,"id":1}"#;

    #[tokio::test]
    async fn test_ticks_flow_from_feed_to_candles() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Minimal exchange: ack the subscription, serve three trades of the
        // 12:00 scenario, hold the socket until the client closes.
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            let _request = ws.next().await.unwrap().unwrap();
            ws.send(Message::Text(ACK.into())).await.unwrap();
            for (id, price, qty, ms) in [
                (1, "100", "1", 1_717_243_210_000_i64),
                (2, "105", "2", 1_717_243_240_000),
                (3, "95", "1", 1_717_243_250_000),
            ] {
                let frame = format!(
                    r#"{{"e":"trade","s":"BTCUSDT","t":{id},"p":"{price}","q":"{qty}","T":{ms}}}"#
                );
                ws.send(Message::Text(frame.into())).await.unwrap();
            }
            let _ = timeout(Duration::from_secs(10), ws.next()).await;
        });

        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("pipeline.db");
        let config = PipelineConfig {
            symbols: vec!["BTCUSDT".to_string()],
            db_path: db_path.clone(),
            feed: FeedConfig {
                endpoint: format!("ws://{addr}"),
                ..FeedConfig::default()
            },
            aggregate_interval: Duration::from_millis(50),
            ..PipelineConfig::default()
        };

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let run = tokio::spawn(Pipeline::new(config).run(shutdown_rx));

        let store = {
            let mut opened = None;
            for _ in 0..100 {
                sleep(Duration::from_millis(50)).await;
                if db_path.exists() {
                    opened = Some(MarketStore::open(&db_path).await.unwrap());
                    break;
                }
            }
            opened.expect("store not created within 5s")
        };

        let bucket = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut candles = Vec::new();
        for _ in 0..100 {
            candles = store.candles_since("BTCUSDT", bucket).await.unwrap();
            if candles.first().is_some_and(|candle| candle.trade_count == 3) {
                break;
            }
            sleep(Duration::from_millis(50)).await;
        }

        shutdown_tx.send(true).unwrap();
        timeout(Duration::from_secs(5), run)
            .await
            .unwrap()
            .unwrap()
            .unwrap();

        assert_eq!(candles.len(), 1);
        let candle = &candles[0];
        assert!((candle.open - 100.0).abs() < 1e-10);
        assert!((candle.high - 105.0).abs() < 1e-10);
        assert!((candle.low - 95.0).abs() < 1e-10);
        assert!((candle.close - 95.0).abs() < 1e-10);
        assert!((candle.volume - 4.0).abs() < 1e-10);
        assert_eq!(candle.trade_count, 3);
    }

    #[tokio::test]
    async fn test_empty_symbol_list_is_a_config_error() {
        let config = PipelineConfig::default().with_symbols(Vec::new());
        let (_tx, rx) = watch::channel(false);
        let error = Pipeline::new(config).run(rx).await.unwrap_err();
        assert!(matches!(error, PamperoError::Config(_)));
    }
}
