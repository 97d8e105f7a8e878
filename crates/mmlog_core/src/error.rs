//! Error types for region operations.

use std::io;
use thiserror::Error;

/// Result type for region operations.
pub type RegionResult<T> = Result<T, RegionError>;

/// Errors that can occur while operating on a log region.
#[derive(Debug, Error)]
pub enum RegionError {
    /// Backing store error.
    #[error("store error: {0}")]
    Store(#[from] mmlog_storage::StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The record does not fit under the reject-on-overflow policy, or is
    /// larger than the whole payload area.
    #[error("capacity exceeded: record needs {needed} bytes, {available} available")]
    CapacityExceeded {
        /// Encoded record size including the delimiter.
        needed: u64,
        /// Bytes available for the record.
        available: u64,
    },

    /// Operation on a released (or never-opened) region.
    #[error("region is closed")]
    Closed,

    /// The region file's header does not describe a readable region.
    #[error("region corrupted: {message}")]
    Corrupted {
        /// Description of the corruption.
        message: String,
    },
}

impl RegionError {
    /// Creates a corruption error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted {
            message: message.into(),
        }
    }
}
