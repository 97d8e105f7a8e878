//! # mmlog Storage
//!
//! Memory-mapped backing store for mmlog regions.
//!
//! This crate provides the lowest-level layer of the engine: a
//! fixed-capacity file mapped into process memory, with a small reserved
//! header holding the durable write cursor (and the day identifier for
//! rotating regions). It is an **opaque byte store** - record framing,
//! overflow policy, and rotation all live a layer up in `mmlog_core`.
//!
//! ## Design Principles
//!
//! - No system calls on the write path: appends are `memcpy`s into the
//!   mapping
//! - The header cursor is updated only after record bytes land, so a crash
//!   mid-write leaves the cursor pointing before the partial record
//! - One store exclusively owns one mapped file, enforced with an advisory
//!   file lock
//!
//! ## Example
//!
//! ```no_run
//! use mmlog_storage::{MapStore, HEADER_SIZE};
//! use std::path::Path;
//!
//! let mut store = MapStore::open(Path::new("region.mmap"), 1024).unwrap();
//! store.write_at(HEADER_SIZE, b"hello\n").unwrap();
//! store.set_cursor(HEADER_SIZE + 6);
//! store.flush().unwrap();
//! ```

#![warn(missing_docs)]

mod error;
pub mod header;
mod map;

pub use error::{StoreError, StoreResult};
pub use header::HEADER_SIZE;
pub use map::MapStore;
