//! Output formatting for the pampero CLI.

use chrono::{DateTime, TimeDelta, Utc};

use pampero_lib::SymbolStatus;

/// Prints one symbol's freshness block.
pub(crate) fn print_symbol_status(status: &SymbolStatus, now: DateTime<Utc>) {
    println!("{}:", status.symbol);
    println!("  Ticks: {}", status.tick_count);
    println!("  Candles: {}", status.candle_count);
    match (status.latest_bucket, status.latest_close) {
        (Some(bucket), Some(close)) => {
            println!("  Last bucket: {} UTC", bucket.format("%Y-%m-%d %H:%M"));
            println!("  Last close: {close}");
            if let Some(staleness) = status.staleness(now) {
                println!("  Staleness: {}", format_staleness(staleness));
            }
        }
        _ => println!("  Last bucket: none"),
    }
}

/// Formats a staleness delta for humans.
pub(crate) fn format_staleness(delta: TimeDelta) -> String {
    let secs = delta.num_seconds();
    if secs < 0 {
        "in the future".to_string()
    } else if secs < 120 {
        format!("{secs}s")
    } else if secs < 7200 {
        format!("{:.1}m", secs as f64 / 60.0)
    } else {
        format!("{:.1}h", secs as f64 / 3600.0)
    }
}
