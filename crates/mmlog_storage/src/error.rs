//! Error types for store operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while opening or accessing a backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The requested capacity cannot hold the header plus any payload.
    #[error("capacity {capacity} is too small: must exceed the {header} byte header")]
    InvalidCapacity {
        /// The requested capacity in bytes.
        capacity: u64,
        /// The fixed header size in bytes.
        header: u64,
    },

    /// Another process holds the exclusive lock on the backing file.
    #[error("store file is locked by another process: {path}")]
    Locked {
        /// Path to the locked file.
        path: PathBuf,
    },

    /// An access fell outside the mapped capacity.
    #[error("access out of bounds: offset {offset}, len {len}, capacity {capacity}")]
    OutOfBounds {
        /// The requested offset.
        offset: u64,
        /// The requested length.
        len: usize,
        /// The mapped capacity.
        capacity: u64,
    },
}
