//! Region statistics and self-diagnostics.
//!
//! Append failures are recovered locally by the logging façade and never
//! propagate to application logic, so drops must be observable somewhere:
//! these counters are that side channel.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one region.
///
/// All counters are atomic and can be read while appends are in progress.
#[derive(Debug, Default)]
pub struct RegionStats {
    /// Records successfully appended.
    appended_records: AtomicU64,
    /// Payload bytes successfully appended (delimiters included).
    appended_bytes: AtomicU64,
    /// Records dropped (overflow under reject policy, closed region, store
    /// failures).
    dropped_records: AtomicU64,
    /// Cursor wraps under the wrap policy.
    wraps: AtomicU64,
    /// Daily rotations performed.
    rotations: AtomicU64,
}

impl RegionStats {
    /// Creates a zeroed counter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_append(&self, bytes: u64) {
        self.appended_records.fetch_add(1, Ordering::Relaxed);
        self.appended_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub(crate) fn record_drop(&self) {
        self.dropped_records.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_wrap(&self) {
        self.wraps.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rotation(&self) {
        self.rotations.fetch_add(1, Ordering::Relaxed);
    }

    /// Takes a point-in-time snapshot of all counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            appended_records: self.appended_records.load(Ordering::Relaxed),
            appended_bytes: self.appended_bytes.load(Ordering::Relaxed),
            dropped_records: self.dropped_records.load(Ordering::Relaxed),
            wraps: self.wraps.load(Ordering::Relaxed),
            rotations: self.rotations.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of [`RegionStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Records successfully appended.
    pub appended_records: u64,
    /// Payload bytes successfully appended.
    pub appended_bytes: u64,
    /// Records dropped.
    pub dropped_records: u64,
    /// Cursor wraps.
    pub wraps: u64,
    /// Daily rotations performed.
    pub rotations: u64,
}
