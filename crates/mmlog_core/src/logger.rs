//! Level/tag formatting façade over regions.
//!
//! Call sites log through [`Logger`], which formats
//! `"<time> <L>/<tag>: <message>"` lines and appends them to its region.
//! Append failures are recovered here - counted in the region's stats and
//! reported at warn level - so a broken log stream never disturbs
//! application logic. Region open failures, by contrast, stay typed errors
//! the caller must observe.

use crate::config::RegionConfig;
use crate::error::RegionResult;
use crate::region::Region;
use chrono::Local;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Timestamp format for record prefixes and the startup banner.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Record severity, rendered as a single letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Verbose diagnostics.
    Verbose,
    /// Debug information.
    Debug,
    /// Informational records.
    Info,
    /// Warnings.
    Warn,
    /// Errors.
    Error,
}

impl Level {
    /// Returns the single-letter rendering used in record prefixes.
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::Verbose => 'V',
            Self::Debug => 'D',
            Self::Info => 'I',
            Self::Warn => 'W',
            Self::Error => 'E',
        }
    }
}

/// Process metadata written in the startup banner.
///
/// All values are caller-provided; the engine performs no environment
/// lookups of its own.
#[derive(Debug, Clone)]
pub struct StartupInfo {
    /// Process name.
    pub process: String,
    /// Process ID.
    pub pid: u32,
    /// Package or binary identifier.
    pub package: String,
    /// Application version string.
    pub version: String,
    /// Device or host description.
    pub device: String,
}

/// Formatting façade over one region.
#[derive(Debug, Clone)]
pub struct Logger {
    region: Arc<Region>,
}

impl Logger {
    /// Creates a logger writing to the given region.
    #[must_use]
    pub fn new(region: Arc<Region>) -> Self {
        Self { region }
    }

    /// Returns the region this logger writes to.
    #[must_use]
    pub fn region(&self) -> &Arc<Region> {
        &self.region
    }

    /// Logs at verbose level.
    pub fn v(&self, tag: &str, msg: &str) {
        self.log(Level::Verbose, tag, msg);
    }

    /// Logs at debug level.
    pub fn d(&self, tag: &str, msg: &str) {
        self.log(Level::Debug, tag, msg);
    }

    /// Logs at info level.
    pub fn i(&self, tag: &str, msg: &str) {
        self.log(Level::Info, tag, msg);
    }

    /// Logs at warn level.
    pub fn w(&self, tag: &str, msg: &str) {
        self.log(Level::Warn, tag, msg);
    }

    /// Logs at error level.
    pub fn e(&self, tag: &str, msg: &str) {
        self.log(Level::Error, tag, msg);
    }

    /// Formats and appends one record.
    ///
    /// Never fails from the caller's perspective; dropped records are
    /// counted in the region's stats.
    pub fn log(&self, level: Level, tag: &str, msg: &str) {
        let time = Local::now().format(TIME_FORMAT);
        let line = format!("{time} {}/{tag}: {msg}", level.letter());
        self.append_recovering(&line);
    }

    /// Writes the process-start banner.
    pub fn write_banner(&self, info: &StartupInfo) {
        let time = Local::now().format(TIME_FORMAT);
        let banner = format!(
            "---------------------------- PROCESS STARTED ----------------------------\n\
             Time       : {time}\n\
             PID        : {pid}\n\
             Process    : {process}\n\
             Package    : {package}\n\
             Version    : {version}\n\
             Device     : {device}\n\
             -------------------------------------------------------------------------",
            pid = info.pid,
            process = info.process,
            package = info.package,
            version = info.version,
            device = info.device,
        );
        self.append_recovering(&banner);
    }

    fn append_recovering(&self, text: &str) {
        if let Err(err) = self.region.append(text) {
            // Already counted as a drop by the region.
            warn!(dir = %self.region.dir().display(), error = %err, "log record dropped");
        }
    }
}

/// Explicitly constructed context owning one region per logical stream.
///
/// Replaces the process-wide static handles of a classic logging setup:
/// construct it once at startup, pass it to whoever logs, and release it
/// at shutdown. The `main` stream receives formatted application records;
/// the `logcat` stream receives raw captured system-log lines from an
/// external tailer thread through [`LogContext::write_logcat_line`].
#[derive(Debug)]
pub struct LogContext {
    main: Arc<Region>,
    logcat: Arc<Region>,
}

impl LogContext {
    /// Stream directory name for formatted application records.
    pub const MAIN_STREAM: &'static str = "main";
    /// Stream directory name for captured system-log lines.
    pub const LOGCAT_STREAM: &'static str = "logcat";

    /// Opens both streams under the given root directory.
    ///
    /// # Errors
    ///
    /// Surfaces the first region open failure so the caller can decide
    /// whether logging is available at all.
    pub fn open(root: impl AsRef<Path>, config: RegionConfig) -> RegionResult<Self> {
        let root = root.as_ref();
        let main = Arc::new(Region::open(root.join(Self::MAIN_STREAM), config.clone())?);
        let logcat = Arc::new(Region::open(root.join(Self::LOGCAT_STREAM), config)?);
        Ok(Self { main, logcat })
    }

    /// Returns a formatting logger over the main stream.
    #[must_use]
    pub fn logger(&self) -> Logger {
        Logger::new(Arc::clone(&self.main))
    }

    /// Returns the main stream region.
    #[must_use]
    pub fn main(&self) -> &Arc<Region> {
        &self.main
    }

    /// Returns the logcat stream region.
    #[must_use]
    pub fn logcat(&self) -> &Arc<Region> {
        &self.logcat
    }

    /// Appends one raw captured line to the logcat stream.
    ///
    /// Producer entry point for the system-log tailer thread. Recovered
    /// locally like all record writes.
    pub fn write_logcat_line(&self, line: &str) {
        if let Err(err) = self.logcat.append(line) {
            warn!(error = %err, "logcat record dropped");
        }
    }

    /// Flushes both streams.
    pub fn flush(&self) -> RegionResult<()> {
        self.main.flush()?;
        self.logcat.flush()?;
        Ok(())
    }

    /// Releases both streams. Idempotent; both mappings are torn down
    /// even if one flush fails.
    pub fn release(&self) -> RegionResult<()> {
        let main = self.main.release();
        let logcat = self.logcat.release();
        main?;
        logcat
    }
}
