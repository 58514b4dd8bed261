//! Feed event counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counters for one symbol's feed connection.
///
/// The connection task increments them; the status loop reads a
/// [`snapshot`](Self::snapshot) through a shared `Arc`. Relaxed ordering is
/// enough: these are diagnostics, not synchronization.
#[derive(Debug, Default)]
pub struct FeedCounters {
    accepted: AtomicU64,
    rejected: AtomicU64,
    connects: AtomicU64,
    disconnects: AtomicU64,
    stale_resets: AtomicU64,
}

/// Point-in-time copy of [`FeedCounters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedCountersSnapshot {
    /// Ticks parsed, validated, and handed to the sink.
    pub accepted: u64,
    /// Frames dropped at the parse-or-reject boundary.
    pub rejected: u64,
    /// Sessions that reached the connected state (handshake + ack).
    pub connects: u64,
    /// Sessions that ended in an error, close, rejection, or the idle
    /// liveness deadline.
    pub disconnects: u64,
    /// Sessions ended proactively by the idle liveness deadline.
    pub stale_resets: u64,
}

impl FeedCounters {
    /// Records an accepted tick.
    pub fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a frame dropped at the parse boundary.
    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a session reaching the connected state.
    pub fn record_connect(&self) {
        self.connects.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a session ending in failure.
    pub fn record_disconnect(&self) {
        self.disconnects.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a session ended by the liveness deadline.
    pub fn record_stale(&self) {
        self.stale_resets.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a point-in-time copy of all counters.
    #[must_use]
    pub fn snapshot(&self) -> FeedCountersSnapshot {
        FeedCountersSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            connects: self.connects.load(Ordering::Relaxed),
            disconnects: self.disconnects.load(Ordering::Relaxed),
            stale_resets: self.stale_resets.load(Ordering::Relaxed),
        }
    }
}
