//! Region configuration.

/// Default region capacity: 50 MiB per stream.
pub const DEFAULT_CAPACITY: u64 = 50 * 1024 * 1024;

/// What to do when a record does not fit between the cursor and capacity.
///
/// Both are legitimate designs for a bounded log: `Reject` logs until full
/// then drops new records, `Wrap` keeps the most recent bytes in constant
/// space. `Wrap` is the default because this is a diagnostic log, not an
/// audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Reset the cursor to just after the header and overwrite the oldest
    /// records (ring-buffer semantics).
    #[default]
    Wrap,
    /// Drop the record and report `CapacityExceeded`.
    Reject,
}

/// Configuration for opening a region.
#[derive(Debug, Clone)]
pub struct RegionConfig {
    /// Fixed capacity of each backing file in bytes (header included).
    pub capacity: u64,

    /// Behavior when a record would overflow the remaining capacity.
    pub overflow: OverflowPolicy,

    /// Whether to roll over to a new dated backing file at day boundaries.
    pub rotate_daily: bool,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            overflow: OverflowPolicy::Wrap,
            rotate_daily: false,
        }
    }
}

impl RegionConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the backing file capacity in bytes.
    #[must_use]
    pub const fn capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the overflow policy.
    #[must_use]
    pub const fn overflow(mut self, policy: OverflowPolicy) -> Self {
        self.overflow = policy;
        self
    }

    /// Enables or disables daily rotation.
    #[must_use]
    pub const fn rotate_daily(mut self, value: bool) -> Self {
        self.rotate_daily = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = RegionConfig::default();
        assert_eq!(config.capacity, 50 * 1024 * 1024);
        assert_eq!(config.overflow, OverflowPolicy::Wrap);
        assert!(!config.rotate_daily);
    }

    #[test]
    fn builder_pattern() {
        let config = RegionConfig::new()
            .capacity(1024)
            .overflow(OverflowPolicy::Reject)
            .rotate_daily(true);

        assert_eq!(config.capacity, 1024);
        assert_eq!(config.overflow, OverflowPolicy::Reject);
        assert!(config.rotate_daily);
    }
}
