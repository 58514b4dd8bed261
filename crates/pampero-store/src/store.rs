//! The SQLite-backed market store.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use thiserror::Error;
use tracing::debug;

use pampero_aggregate::{Candle, CandleUpdate, fill_forward};
use pampero_types::{Forecast, PamperoError, StoredTick, Tick};

use crate::schema;

/// Errors that can occur while reading or writing the store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying database failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A persisted timestamp did not convert back to a valid instant.
    #[error("Corrupt timestamp in store: {0}")]
    CorruptTimestamp(i64),
}

impl From<StoreError> for PamperoError {
    fn from(error: StoreError) -> Self {
        Self::Store(error.to_string())
    }
}

/// Per-symbol freshness readout for the status surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolStatus {
    /// Symbol the readout describes.
    pub symbol: String,
    /// Rows in the raw tick log.
    pub tick_count: i64,
    /// Rows in the candle table.
    pub candle_count: i64,
    /// Newest bucket time, if any candle exists.
    pub latest_bucket: Option<DateTime<Utc>>,
    /// Close of the newest bucket, if any candle exists.
    pub latest_close: Option<f64>,
}

impl SymbolStatus {
    /// Age of the newest bucket relative to `now`; `None` with no candles.
    #[must_use]
    pub fn staleness(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.latest_bucket.map(|bucket| now - bucket)
    }
}

/// Pooled handle to the pipeline's SQLite database.
///
/// Cloning is cheap (the pool is shared). Opening bootstraps the schema, so
/// every command works against an empty database file. All timestamps
/// persist as epoch milliseconds.
#[derive(Debug, Clone)]
pub struct MarketStore {
    pool: SqlitePool,
}

impl MarketStore {
    /// Opens (creating if missing) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the file cannot be opened or the schema
    /// bootstrap fails.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePool::connect_with(options).await?;
        for statement in schema::BOOTSTRAP {
            sqlx::query(statement).execute(&pool).await?;
        }
        debug!(path = %path.as_ref().display(), "store opened");
        Ok(Self { pool })
    }

    /// Closes the underlying connection pool.
    ///
    /// Later operations on this store (and its clones) fail with a pool
    /// error instead of hanging. Called once the pipeline's tasks have
    /// stopped.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Appends one tick to the raw log.
    ///
    /// Returns `false` when the tick's `(symbol, trade_id)` identity already
    /// exists (redelivery across a reconnect) and leaves the log untouched.
    /// Ticks without a trade id always insert.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the insert fails.
    pub async fn append_tick(&self, tick: &Tick) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "INSERT INTO raw_ticks (symbol, price, quantity, trade_time, ingest_time, trade_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(symbol, trade_id) WHERE trade_id IS NOT NULL DO NOTHING",
        )
        .bind(&tick.symbol)
        .bind(tick.price)
        .bind(tick.quantity)
        .bind(tick.trade_time.timestamp_millis())
        .bind(tick.ingest_time.timestamp_millis())
        .bind(tick.trade_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Reads up to `limit` ticks with row id greater than `cursor`, in
    /// append order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the query fails or a row is corrupt.
    pub async fn ticks_after(&self, cursor: i64, limit: i64) -> Result<Vec<StoredTick>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, symbol, price, quantity, trade_time, ingest_time, trade_id
             FROM raw_ticks WHERE id > ?1 ORDER BY id LIMIT ?2",
        )
        .bind(cursor)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let tick = Tick::new(
                    row.get::<String, _>("symbol"),
                    row.get::<f64, _>("price"),
                    row.get::<f64, _>("quantity"),
                    from_millis(row.get("trade_time"))?,
                    from_millis(row.get("ingest_time"))?,
                    row.get::<Option<i64>, _>("trade_id"),
                );
                Ok(StoredTick::new(row.get("id"), tick))
            })
            .collect()
    }

    /// Returns the raw-log row id the aggregator has folded through (0 when
    /// no pass has run yet).
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the query fails.
    pub async fn aggregation_cursor(&self) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT value FROM meta WHERE key = ?1")
            .bind(schema::CURSOR_KEY)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row
            .and_then(|row| row.get::<String, _>("value").parse().ok())
            .unwrap_or(0))
    }

    /// Applies one aggregation pass: merges every candle update and advances
    /// the cursor to `cursor`, all in a single transaction.
    ///
    /// The merge is additive on the `(bucket_time, symbol)` key: high and
    /// low extend, volume and trade count sum, close changes only if the
    /// update's closing tick is later (by trade time, then row id) than the
    /// one already recorded, and open and sentiment_score are left alone.
    /// Committing the upserts and the cursor together means a crash between
    /// pass and advance can never double-fold a tick.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if any statement or the commit fails; the
    /// transaction rolls back and the cursor stays put.
    pub async fn apply_aggregation(
        &self,
        updates: &[CandleUpdate],
        cursor: i64,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for update in updates {
            sqlx::query(
                "INSERT INTO candles (bucket_time, symbol, open, high, low, close,
                                      volume, trade_count, last_tick_at, last_tick_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(bucket_time, symbol) DO UPDATE SET
                     high = MAX(candles.high, excluded.high),
                     low = MIN(candles.low, excluded.low),
                     volume = candles.volume + excluded.volume,
                     trade_count = candles.trade_count + excluded.trade_count,
                     close = CASE WHEN excluded.last_tick_at > candles.last_tick_at
                                    OR (excluded.last_tick_at = candles.last_tick_at
                                        AND excluded.last_tick_id > candles.last_tick_id)
                                  THEN excluded.close ELSE candles.close END,
                     last_tick_at = CASE WHEN excluded.last_tick_at > candles.last_tick_at
                                           OR (excluded.last_tick_at = candles.last_tick_at
                                               AND excluded.last_tick_id > candles.last_tick_id)
                                         THEN excluded.last_tick_at ELSE candles.last_tick_at END,
                     last_tick_id = CASE WHEN excluded.last_tick_at > candles.last_tick_at
                                           OR (excluded.last_tick_at = candles.last_tick_at
                                               AND excluded.last_tick_id > candles.last_tick_id)
                                         THEN excluded.last_tick_id ELSE candles.last_tick_id END",
            )
            .bind(update.bucket_time.timestamp_millis())
            .bind(&update.symbol)
            .bind(update.open)
            .bind(update.high)
            .bind(update.low)
            .bind(update.close)
            .bind(update.volume)
            .bind(update.trade_count)
            .bind(update.close_time.timestamp_millis())
            .bind(update.close_seq)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            "INSERT INTO meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(schema::CURSOR_KEY)
        .bind(cursor.to_string())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Reads a symbol's candles with bucket time at or after `from`,
    /// ordered by bucket time. Sparse: empty buckets are absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the query fails or a row is corrupt.
    pub async fn candles_since(
        &self,
        symbol: &str,
        from: DateTime<Utc>,
    ) -> Result<Vec<Candle>, StoreError> {
        let rows = sqlx::query(
            "SELECT bucket_time, symbol, open, high, low, close,
                    volume, trade_count, sentiment_score
             FROM candles WHERE symbol = ?1 AND bucket_time >= ?2
             ORDER BY bucket_time",
        )
        .bind(symbol)
        .bind(from.timestamp_millis())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(candle_from_row).collect()
    }

    /// Reads a symbol's candles over `[from, to]` as a continuous minute
    /// series: buckets with zero trades come back forward-filled from the
    /// previous close (flat prices, zero volume and trade count). Minutes
    /// before the symbol's first candle in the range stay absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the query fails or a row is corrupt.
    pub async fn candle_series(
        &self,
        symbol: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Candle>, StoreError> {
        let rows = sqlx::query(
            "SELECT bucket_time, symbol, open, high, low, close,
                    volume, trade_count, sentiment_score
             FROM candles WHERE symbol = ?1 AND bucket_time >= ?2 AND bucket_time <= ?3
             ORDER BY bucket_time",
        )
        .bind(symbol)
        .bind(from.timestamp_millis())
        .bind(to.timestamp_millis())
        .fetch_all(&self.pool)
        .await?;

        let sparse: Vec<Candle> = rows
            .into_iter()
            .map(candle_from_row)
            .collect::<Result<_, _>>()?;
        Ok(fill_forward(&sparse, from, to))
    }

    /// Sets the sentiment score on one candle, leaving its OHLCV fields
    /// alone. Returns `false` when no candle exists for the key.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the update fails.
    pub async fn set_sentiment(
        &self,
        bucket_time: DateTime<Utc>,
        symbol: &str,
        score: f64,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE candles SET sentiment_score = ?1 WHERE bucket_time = ?2 AND symbol = ?3",
        )
        .bind(score)
        .bind(bucket_time.timestamp_millis())
        .bind(symbol)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Appends one record to the forecast log.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the insert fails.
    pub async fn append_forecast(&self, forecast: &Forecast) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO forecasts (execution_time, forecast_time, predicted_price,
                                    lower_bound, upper_bound)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(forecast.execution_time.timestamp_millis())
        .bind(forecast.forecast_time.timestamp_millis())
        .bind(forecast.predicted_price)
        .bind(forecast.lower_bound)
        .bind(forecast.upper_bound)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Returns one symbol's freshness readout.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if a query fails or a row is corrupt.
    pub async fn symbol_status(&self, symbol: &str) -> Result<SymbolStatus, StoreError> {
        let tick_count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM raw_ticks WHERE symbol = ?1")
            .bind(symbol)
            .fetch_one(&self.pool)
            .await?
            .get("n");
        let candle_count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM candles WHERE symbol = ?1")
            .bind(symbol)
            .fetch_one(&self.pool)
            .await?
            .get("n");
        let newest = sqlx::query(
            "SELECT bucket_time, close FROM candles WHERE symbol = ?1
             ORDER BY bucket_time DESC LIMIT 1",
        )
        .bind(symbol)
        .fetch_optional(&self.pool)
        .await?;

        let (latest_bucket, latest_close) = match newest {
            Some(row) => (
                Some(from_millis(row.get("bucket_time"))?),
                Some(row.get::<f64, _>("close")),
            ),
            None => (None, None),
        };

        Ok(SymbolStatus {
            symbol: symbol.to_string(),
            tick_count,
            candle_count,
            latest_bucket,
            latest_close,
        })
    }

    /// Number of raw-log rows the aggregator has not folded yet.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the query fails.
    pub async fn cursor_lag(&self) -> Result<i64, StoreError> {
        let cursor = self.aggregation_cursor().await?;
        let lag: i64 = sqlx::query("SELECT COUNT(*) AS n FROM raw_ticks WHERE id > ?1")
            .bind(cursor)
            .fetch_one(&self.pool)
            .await?
            .get("n");
        Ok(lag)
    }

    /// Empties the raw log, candle table, forecast log, and the aggregation
    /// cursor. Destructive; the CLI guards it behind a confirmation.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if any delete fails.
    pub async fn reset(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for statement in [
            "DELETE FROM raw_ticks",
            "DELETE FROM candles",
            "DELETE FROM forecasts",
            "DELETE FROM meta",
        ] {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

/// Converts a persisted epoch-millisecond timestamp back to an instant.
fn from_millis(ms: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_millis(ms).ok_or(StoreError::CorruptTimestamp(ms))
}

/// Maps one candle row into the domain type.
fn candle_from_row(row: sqlx::sqlite::SqliteRow) -> Result<Candle, StoreError> {
    Ok(Candle::new(
        from_millis(row.get("bucket_time"))?,
        row.get::<String, _>("symbol"),
        row.get("open"),
        row.get("high"),
        row.get("low"),
        row.get("close"),
        row.get("volume"),
        row.get("trade_count"),
        row.get("sentiment_score"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pampero_aggregate::fold_ticks;
    use tempfile::TempDir;

    async fn open_store(dir: &TempDir) -> MarketStore {
        MarketStore::open(dir.path().join("test.db")).await.unwrap()
    }

    fn at(minute: u32, second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, minute, second).unwrap()
    }

    fn tick(price: f64, quantity: f64, minute: u32, second: u32, trade_id: i64) -> Tick {
        Tick::new(
            "BTCUSDT",
            price,
            quantity,
            at(minute, second),
            at(minute, second),
            Some(trade_id),
        )
    }

    /// Appends ticks, folds everything past the cursor, applies the pass.
    async fn run_pass(store: &MarketStore) {
        let cursor = store.aggregation_cursor().await.unwrap();
        let batch = store.ticks_after(cursor, 10_000).await.unwrap();
        let last = batch.last().map_or(cursor, |stored| stored.seq);
        let updates = fold_ticks(&batch);
        store.apply_aggregation(&updates, last).await.unwrap();
    }

    #[tokio::test]
    async fn test_append_and_read_back() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        assert!(store.append_tick(&tick(100.0, 1.0, 0, 10, 1)).await.unwrap());
        let batch = store.ticks_after(0, 100).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].seq, 1);
        assert_eq!(batch[0].tick.symbol, "BTCUSDT");
        assert_eq!(batch[0].tick.trade_time, at(0, 10));
        assert_eq!(batch[0].tick.trade_id, Some(1));
    }

    #[tokio::test]
    async fn test_duplicate_trade_id_is_suppressed() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let redelivered = tick(100.0, 1.0, 0, 10, 42);
        assert!(store.append_tick(&redelivered).await.unwrap());
        assert!(!store.append_tick(&redelivered).await.unwrap());
        assert_eq!(store.ticks_after(0, 100).await.unwrap().len(), 1);

        // Folding after redelivery sees the tick once: volume and count as
        // if it was delivered exactly once.
        run_pass(&store).await;
        let candles = store.candles_since("BTCUSDT", at(0, 0)).await.unwrap();
        assert_eq!(candles[0].trade_count, 1);
        assert!((candles[0].volume - 1.0).abs() < 1e-10);
    }

    #[tokio::test]
    async fn test_ticks_without_trade_id_always_insert() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let mut anonymous = tick(100.0, 1.0, 0, 10, 0);
        anonymous.trade_id = None;
        assert!(store.append_tick(&anonymous).await.unwrap());
        assert!(store.append_tick(&anonymous).await.unwrap());
        assert_eq!(store.ticks_after(0, 100).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_single_pass_builds_candle() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        store.append_tick(&tick(100.0, 1.0, 0, 10, 1)).await.unwrap();
        store.append_tick(&tick(105.0, 2.0, 0, 40, 2)).await.unwrap();
        store.append_tick(&tick(95.0, 1.0, 0, 50, 3)).await.unwrap();
        run_pass(&store).await;

        let candles = store.candles_since("BTCUSDT", at(0, 0)).await.unwrap();
        assert_eq!(candles.len(), 1);
        let candle = &candles[0];
        assert_eq!(candle.bucket_time, at(0, 0));
        assert!((candle.open - 100.0).abs() < 1e-10);
        assert!((candle.high - 105.0).abs() < 1e-10);
        assert!((candle.low - 95.0).abs() < 1e-10);
        assert!((candle.close - 95.0).abs() < 1e-10);
        assert!((candle.volume - 4.0).abs() < 1e-10);
        assert_eq!(candle.trade_count, 3);
        assert!((candle.sentiment_score).abs() < 1e-10);

        assert_eq!(store.aggregation_cursor().await.unwrap(), 3);
        assert_eq!(store.cursor_lag().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_late_tick_merges_into_its_own_bucket() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        store.append_tick(&tick(100.0, 1.0, 0, 10, 1)).await.unwrap();
        store.append_tick(&tick(105.0, 2.0, 0, 40, 2)).await.unwrap();
        store.append_tick(&tick(95.0, 1.0, 0, 50, 3)).await.unwrap();
        store.append_tick(&tick(101.0, 1.0, 1, 5, 4)).await.unwrap();
        run_pass(&store).await;

        // A trade from 12:00:05 arrives after bucket 12:01 already exists.
        store.append_tick(&tick(90.0, 1.0, 0, 5, 5)).await.unwrap();
        run_pass(&store).await;

        let candles = store.candles_since("BTCUSDT", at(0, 0)).await.unwrap();
        assert_eq!(candles.len(), 2);
        let noon = &candles[0];
        assert_eq!(noon.bucket_time, at(0, 0));
        // The late tick widens low and adds volume but steals neither the
        // established open nor the 12:00:50 close.
        assert!((noon.open - 100.0).abs() < 1e-10);
        assert!((noon.low - 90.0).abs() < 1e-10);
        assert!((noon.close - 95.0).abs() < 1e-10);
        assert!((noon.volume - 5.0).abs() < 1e-10);
        assert_eq!(noon.trade_count, 4);

        let next = &candles[1];
        assert_eq!(next.bucket_time, at(1, 0));
        assert_eq!(next.trade_count, 1);
    }

    #[tokio::test]
    async fn test_cross_pass_close_stays_latest() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        store.append_tick(&tick(100.0, 1.0, 0, 50, 1)).await.unwrap();
        run_pass(&store).await;
        // Later pass carries only an earlier tick for the same bucket.
        store.append_tick(&tick(110.0, 1.0, 0, 10, 2)).await.unwrap();
        run_pass(&store).await;

        let candles = store.candles_since("BTCUSDT", at(0, 0)).await.unwrap();
        assert!((candles[0].close - 100.0).abs() < 1e-10);
        assert!((candles[0].high - 110.0).abs() < 1e-10);
    }

    #[tokio::test]
    async fn test_sentiment_survives_ohlcv_merge() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        store.append_tick(&tick(100.0, 1.0, 0, 10, 1)).await.unwrap();
        run_pass(&store).await;

        assert!(store.set_sentiment(at(0, 0), "BTCUSDT", 0.6).await.unwrap());
        store.append_tick(&tick(102.0, 1.0, 0, 30, 2)).await.unwrap();
        run_pass(&store).await;

        let candles = store.candles_since("BTCUSDT", at(0, 0)).await.unwrap();
        assert!((candles[0].sentiment_score - 0.6).abs() < 1e-10);
        assert_eq!(candles[0].trade_count, 2);
    }

    #[tokio::test]
    async fn test_sentiment_on_missing_candle_reports_false() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        assert!(!store.set_sentiment(at(0, 0), "BTCUSDT", 0.5).await.unwrap());
    }

    #[tokio::test]
    async fn test_candle_series_forward_fills_gap() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        store.append_tick(&tick(100.0, 1.0, 0, 10, 1)).await.unwrap();
        store.append_tick(&tick(104.0, 1.0, 2, 10, 2)).await.unwrap();
        run_pass(&store).await;

        let series = store
            .candle_series("BTCUSDT", at(0, 0), at(2, 0))
            .await
            .unwrap();
        assert_eq!(series.len(), 3);
        let synthetic = &series[1];
        assert!(synthetic.is_synthetic());
        assert!((synthetic.open - 100.0).abs() < 1e-10);
        assert!((synthetic.close - 100.0).abs() < 1e-10);
        assert!((synthetic.volume).abs() < 1e-10);
        assert_eq!(synthetic.trade_count, 0);
    }

    #[tokio::test]
    async fn test_forecast_append() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let forecast = Forecast::new(at(0, 0), at(10, 0), 101.5, 99.0, 104.0);
        store.append_forecast(&forecast).await.unwrap();
        store.append_forecast(&forecast).await.unwrap();

        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM forecasts")
            .fetch_one(&store.pool)
            .await
            .unwrap()
            .get("n");
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_symbol_status_and_lag() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        store.append_tick(&tick(100.0, 1.0, 0, 10, 1)).await.unwrap();
        store.append_tick(&tick(101.0, 1.0, 1, 10, 2)).await.unwrap();
        run_pass(&store).await;
        store.append_tick(&tick(102.0, 1.0, 1, 30, 3)).await.unwrap();

        let status = store.symbol_status("BTCUSDT").await.unwrap();
        assert_eq!(status.tick_count, 3);
        assert_eq!(status.candle_count, 2);
        assert_eq!(status.latest_bucket, Some(at(1, 0)));
        assert!((status.latest_close.unwrap() - 101.0).abs() < 1e-10);
        assert_eq!(
            status.staleness(at(3, 0)),
            Some(TimeDelta::minutes(2))
        );
        assert_eq!(store.cursor_lag().await.unwrap(), 1);

        let empty = store.symbol_status("ETHUSDT").await.unwrap();
        assert_eq!(empty.tick_count, 0);
        assert!(empty.latest_bucket.is_none());
        assert!(empty.staleness(at(3, 0)).is_none());
    }

    #[tokio::test]
    async fn test_closed_store_fails_writes() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        store.close().await;

        let error = store.append_tick(&tick(100.0, 1.0, 0, 10, 1)).await;
        assert!(matches!(error, Err(StoreError::Database(_))));
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        store.append_tick(&tick(100.0, 1.0, 0, 10, 1)).await.unwrap();
        run_pass(&store).await;
        store
            .append_forecast(&Forecast::new(at(0, 0), at(10, 0), 101.0, 99.0, 103.0))
            .await
            .unwrap();

        store.reset().await.unwrap();

        assert!(store.ticks_after(0, 100).await.unwrap().is_empty());
        assert!(store.candles_since("BTCUSDT", at(0, 0)).await.unwrap().is_empty());
        assert_eq!(store.aggregation_cursor().await.unwrap(), 0);
    }
}
