//! Region handle and append engine.

use crate::config::{OverflowPolicy, RegionConfig};
use crate::error::{RegionError, RegionResult};
use crate::rotation;
use crate::stats::RegionStats;
use chrono::NaiveDate;
use mmlog_storage::{MapStore, HEADER_SIZE};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// One append-only log stream backed by one mapped file at a time.
///
/// A region owns a stream directory. Non-rotating regions keep a single
/// `region.mmap` inside it; rotating regions keep one dated file per
/// calendar day and switch files on the first append of a new day.
///
/// # Concurrency
///
/// All mutating operations (`append`, the rotation check, `flush`,
/// `release`) serialize on one internal mutex, so any number of producer
/// threads may share a region. Two regions are fully independent.
///
/// # Crash safety
///
/// Record bytes are copied into the mapping before the header cursor is
/// advanced, so a crash mid-append leaves the persisted cursor pointing
/// before the partial record. The corrupted tail is overwritten by the
/// next append after restart.
pub struct Region {
    dir: PathBuf,
    config: RegionConfig,
    stats: RegionStats,
    inner: Mutex<Option<ActiveStore>>,
}

/// The currently open backing store plus its in-memory write state.
struct ActiveStore {
    store: MapStore,
    cursor: u64,
    day: NaiveDate,
}

impl ActiveStore {
    /// Opens the backing file for `day`, recovering the cursor from its
    /// header.
    fn open(dir: &Path, config: &RegionConfig, day: NaiveDate) -> RegionResult<Self> {
        let path = rotation::active_path(dir, config.rotate_daily, day);
        let mut store = MapStore::open(&path, config.capacity)?;

        let mut cursor = store.cursor();
        if cursor == 0 {
            // Freshly created file: first write begins after the header.
            cursor = HEADER_SIZE;
            store.set_cursor(cursor);
        } else if cursor < HEADER_SIZE || cursor > store.capacity() {
            warn!(
                path = %path.display(),
                cursor,
                capacity = store.capacity(),
                "header cursor out of range, resetting region"
            );
            cursor = HEADER_SIZE;
            store.set_cursor(cursor);
        }

        if config.rotate_daily {
            store.set_day(rotation::day_to_header(day));
        }

        Ok(Self { store, cursor, day })
    }
}

impl Region {
    /// Opens a region rooted at the given stream directory, creating the
    /// directory and backing file as needed.
    ///
    /// A previously written file resumes at its persisted cursor.
    ///
    /// # Errors
    ///
    /// Open failures are always surfaced as typed errors so the caller can
    /// decide whether logging is available; there is no silent no-op
    /// fallback at this layer.
    pub fn open(dir: impl AsRef<Path>, config: RegionConfig) -> RegionResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let active = ActiveStore::open(&dir, &config, rotation::current_day())?;
        Ok(Self {
            dir,
            config,
            stats: RegionStats::new(),
            inner: Mutex::new(Some(active)),
        })
    }

    /// Appends one UTF-8 text record, followed by the `\n` delimiter.
    ///
    /// Synchronous: the record is copied into the mapping and the header
    /// cursor advanced before this returns. No intermediate buffering, so
    /// nothing is lost to a queue on crash.
    ///
    /// # Errors
    ///
    /// - [`RegionError::Closed`] after `release`
    /// - [`RegionError::CapacityExceeded`] if the record cannot fit (under
    ///   the reject policy, or if it exceeds the whole payload area)
    /// - [`RegionError::Store`] on backing store failures
    pub fn append(&self, text: &str) -> RegionResult<()> {
        self.append_on_day(text, rotation::current_day())
    }

    /// Appends with an explicit notion of "today"; the day is what drives
    /// rotation, so tests inject one here.
    fn append_on_day(&self, text: &str, today: NaiveDate) -> RegionResult<()> {
        let mut guard = self.inner.lock();
        let result = self.append_locked(&mut guard, text, today);
        if result.is_err() {
            self.stats.record_drop();
        }
        result
    }

    fn append_locked(
        &self,
        slot: &mut Option<ActiveStore>,
        text: &str,
        today: NaiveDate,
    ) -> RegionResult<()> {
        let needs_rotation = {
            let active = slot.as_ref().ok_or(RegionError::Closed)?;
            self.config.rotate_daily && active.day != today
        };
        if needs_rotation {
            self.rotate(slot, today)?;
        }
        let active = slot.as_mut().ok_or(RegionError::Closed)?;

        let mut record = Vec::with_capacity(text.len() + 1);
        record.extend_from_slice(text.as_bytes());
        record.push(b'\n');

        let needed = record.len() as u64;
        let capacity = active.store.capacity();

        // A record larger than the whole payload area can never fit.
        if needed > capacity - HEADER_SIZE {
            return Err(RegionError::CapacityExceeded {
                needed,
                available: capacity - HEADER_SIZE,
            });
        }

        if active.cursor + needed > capacity {
            match self.config.overflow {
                OverflowPolicy::Reject => {
                    return Err(RegionError::CapacityExceeded {
                        needed,
                        available: capacity - active.cursor,
                    });
                }
                OverflowPolicy::Wrap => {
                    active.cursor = HEADER_SIZE;
                    self.stats.record_wrap();
                }
            }
        }

        // Record bytes first, cursor second.
        active.store.write_at(active.cursor, &record)?;
        active.cursor += needed;
        let cursor = active.cursor;
        active.store.set_cursor(cursor);

        self.stats.record_append(needed);
        Ok(())
    }

    /// Retires the current backing store and opens the dated file for
    /// `today`. Runs under the region mutex, atomically with the append
    /// that triggered it.
    fn rotate(&self, slot: &mut Option<ActiveStore>, today: NaiveDate) -> RegionResult<()> {
        if let Some(old) = slot.take() {
            // Flush best-effort: a failed msync should not stop the log
            // from moving to the new day.
            if let Err(err) = old.store.flush() {
                warn!(
                    path = %old.store.path().display(),
                    error = %err,
                    "flush of retiring backing file failed"
                );
            }
            // Old mapping dropped (unmapped, unlocked) before the new
            // file opens.
        }

        let fresh = ActiveStore::open(&self.dir, &self.config, today)?;
        *slot = Some(fresh);
        self.stats.record_rotation();
        Ok(())
    }

    /// Forces all dirty mapped pages of the active file to stable storage.
    ///
    /// Serialized with appends, so a half-written record is never flushed.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::Closed`] after `release`.
    pub fn flush(&self) -> RegionResult<()> {
        let guard = self.inner.lock();
        let active = guard.as_ref().ok_or(RegionError::Closed)?;
        active.store.flush()?;
        Ok(())
    }

    /// Flushes, unmaps, and closes the backing file.
    ///
    /// Idempotent: calling it again (or on a region whose store was
    /// already torn down) is a no-op. The mapping is released even if the
    /// final flush fails; in that case the flush error is returned after
    /// teardown. Subsequent `append`/`flush` calls return
    /// [`RegionError::Closed`].
    pub fn release(&self) -> RegionResult<()> {
        let mut guard = self.inner.lock();
        match guard.take() {
            Some(active) => {
                let flushed = active.store.flush();
                drop(active);
                flushed?;
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Returns whether the region still owns an open backing store.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.lock().is_some()
    }

    /// Returns the current write cursor of the active file.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::Closed`] after `release`.
    pub fn cursor(&self) -> RegionResult<u64> {
        let guard = self.inner.lock();
        let active = guard.as_ref().ok_or(RegionError::Closed)?;
        Ok(active.cursor)
    }

    /// Returns the path of the active backing file.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::Closed`] after `release`.
    pub fn active_path(&self) -> RegionResult<PathBuf> {
        let guard = self.inner.lock();
        let active = guard.as_ref().ok_or(RegionError::Closed)?;
        Ok(active.store.path().to_path_buf())
    }

    /// Returns the stream directory this region is rooted at.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the region's self-diagnostic counters.
    #[must_use]
    pub fn stats(&self) -> &RegionStats {
        &self.stats
    }
}

impl Drop for Region {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!(dir = %self.dir.display(), error = %err, "release on drop failed");
        }
    }
}

impl std::fmt::Debug for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Region")
            .field("dir", &self.dir)
            .field("config", &self.config)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}
