//! Schema bootstrap statements.
//!
//! Applied in order on every open; each statement is idempotent so `run`
//! works against a brand-new database file. Timestamps are stored as epoch
//! milliseconds throughout.

/// All statements needed to bring an empty database to the current schema.
pub(crate) const BOOTSTRAP: &[&str] = &[
    // Append-only raw tick log. `id` is the ingest order the aggregator's
    // fold uses as its trade-time tie-break.
    "CREATE TABLE IF NOT EXISTS raw_ticks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        symbol TEXT NOT NULL,
        price REAL NOT NULL,
        quantity REAL NOT NULL,
        trade_time INTEGER NOT NULL,
        ingest_time INTEGER NOT NULL,
        trade_id INTEGER
    )",
    // Deduplication identity for feeds that number their trades. Ticks
    // without a trade id fall outside the constraint on purpose.
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_raw_ticks_identity
        ON raw_ticks(symbol, trade_id) WHERE trade_id IS NOT NULL",
    "CREATE INDEX IF NOT EXISTS idx_raw_ticks_symbol_time
        ON raw_ticks(symbol, trade_time)",
    // One-minute candle per (bucket_time, symbol). `last_tick_at` and
    // `last_tick_id` identify the tick that set `close`, so a late merge
    // never lets an older tick overwrite it. `sentiment_score` belongs to
    // the sentiment collaborator and is never touched by the merge-upsert.
    "CREATE TABLE IF NOT EXISTS candles (
        bucket_time INTEGER NOT NULL,
        symbol TEXT NOT NULL,
        open REAL NOT NULL,
        high REAL NOT NULL,
        low REAL NOT NULL,
        close REAL NOT NULL,
        volume REAL NOT NULL,
        trade_count INTEGER NOT NULL,
        sentiment_score REAL NOT NULL DEFAULT 0,
        last_tick_at INTEGER NOT NULL,
        last_tick_id INTEGER NOT NULL,
        PRIMARY KEY (bucket_time, symbol)
    )",
    // Append-only forecast log written on the forecasting collaborator's
    // behalf; never read back here.
    "CREATE TABLE IF NOT EXISTS forecasts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        execution_time INTEGER NOT NULL,
        forecast_time INTEGER NOT NULL,
        predicted_price REAL NOT NULL,
        lower_bound REAL NOT NULL,
        upper_bound REAL NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )",
];

/// Meta key holding the raw-log row id the aggregator has folded through.
pub(crate) const CURSOR_KEY: &str = "aggregation_cursor";
