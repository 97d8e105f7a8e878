//! # mmlog Core
//!
//! Crash-resilient append-log engine over memory-mapped backing files.
//!
//! This crate provides:
//! - [`Region`]: one append-only log stream, serialized for concurrent
//!   producers, with a durable write cursor and wrap/reject overflow
//!   handling
//! - Daily rotation to dated backing files
//! - [`Logger`] / [`LogContext`]: the level/tag formatting façade and the
//!   per-stream context object for application call sites
//! - [`RegionSnapshot`]: read-only inspection of backing files
//!
//! ## Example
//!
//! ```no_run
//! use mmlog_core::{LogContext, RegionConfig};
//!
//! let ctx = LogContext::open("/data/logs", RegionConfig::new()).unwrap();
//! let log = ctx.logger();
//! log.i("startup", "logging online");
//! ctx.flush().unwrap();
//! ctx.release().unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod inspect;
mod logger;
mod region;
mod rotation;
mod stats;

pub use config::{OverflowPolicy, RegionConfig, DEFAULT_CAPACITY};
pub use mmlog_storage::HEADER_SIZE;
pub use error::{RegionError, RegionResult};
pub use inspect::RegionSnapshot;
pub use logger::{Level, LogContext, Logger, StartupInfo};
pub use region::Region;
pub use stats::{RegionStats, StatsSnapshot};
