//! Memory-mapped backing store.

use crate::error::{StoreError, StoreResult};
use crate::header::{self, HEADER_SIZE};
use fs2::FileExt;
use memmap2::{MmapMut, MmapOptions};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// A fixed-capacity, memory-mapped backing file.
///
/// The store is an opaque byte range: it knows the header layout (cursor
/// and day fields) but nothing about record formats or rotation. Writes go
/// straight into the mapping, so the hot path makes no system calls; dirty
/// pages survive a process crash because the mapping is shared with the
/// page cache.
///
/// # Ownership
///
/// The store holds a `fs2` exclusive lock on the backing file for its
/// whole lifetime. No other process (or second store in this process) can
/// map the same file concurrently. Dropping the store unmaps the file and
/// releases the lock on every exit path.
#[derive(Debug)]
pub struct MapStore {
    path: PathBuf,
    map: MmapMut,
    capacity: u64,
    // Held for the exclusive lock; unlocked when the fd closes.
    _file: File,
}

impl MapStore {
    /// Opens or creates a backing file of exactly `capacity` mapped bytes.
    ///
    /// A missing file is created; an existing file smaller than `capacity`
    /// is sparse-extended. Existing content is never truncated, so a file
    /// larger than `capacity` keeps its length and only the first
    /// `capacity` bytes are mapped.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidCapacity`] if `capacity` leaves no payload
    ///   room after the header
    /// - [`StoreError::Locked`] if another process holds the file
    /// - [`StoreError::Io`] if the file cannot be created, sized, or mapped
    #[allow(unsafe_code)] // sole mapping of a file this store exclusively locks
    pub fn open(path: &Path, capacity: u64) -> StoreResult<Self> {
        if capacity <= HEADER_SIZE {
            return Err(StoreError::InvalidCapacity {
                capacity,
                header: HEADER_SIZE,
            });
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        if file.try_lock_exclusive().is_err() {
            return Err(StoreError::Locked {
                path: path.to_path_buf(),
            });
        }

        // Sparse-extend to capacity; never shrink an existing file.
        if file.metadata()?.len() < capacity {
            file.set_len(capacity)?;
        }

        let len = usize::try_from(capacity).map_err(|_| StoreError::InvalidCapacity {
            capacity,
            header: HEADER_SIZE,
        })?;
        let map = unsafe { MmapOptions::new().len(len).map_mut(&file)? };

        Ok(Self {
            path: path.to_path_buf(),
            map,
            capacity,
            _file: file,
        })
    }

    /// Returns the mapped capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Returns the path to the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted write cursor from the header.
    #[must_use]
    pub fn cursor(&self) -> u64 {
        header::read_cursor(&self.map)
    }

    /// Persists the write cursor into the header.
    ///
    /// A single aligned 8-byte store into a mapped page; not torn on the
    /// platforms this engine targets, so no journal is kept.
    pub fn set_cursor(&mut self, cursor: u64) {
        header::write_cursor(&mut self.map, cursor);
    }

    /// Reads the day identifier from the header (0 = unset).
    #[must_use]
    pub fn day(&self) -> u64 {
        header::read_day(&self.map)
    }

    /// Persists the day identifier into the header.
    pub fn set_day(&mut self, day: u64) {
        header::write_day(&mut self.map, day);
    }

    /// Copies `data` into the mapping at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OutOfBounds`] if the write would cross the
    /// mapped capacity.
    pub fn write_at(&mut self, offset: u64, data: &[u8]) -> StoreResult<()> {
        let end = self.checked_range(offset, data.len())?;
        let start = offset as usize;
        self.map[start..end].copy_from_slice(data);
        Ok(())
    }

    /// Reads `len` bytes from the mapping at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OutOfBounds`] if the read would cross the
    /// mapped capacity.
    pub fn read_at(&self, offset: u64, len: usize) -> StoreResult<Vec<u8>> {
        let end = self.checked_range(offset, len)?;
        Ok(self.map[offset as usize..end].to_vec())
    }

    /// Forces all dirty mapped pages to stable storage.
    pub fn flush(&self) -> StoreResult<()> {
        self.map.flush()?;
        Ok(())
    }

    /// Forces only the header prefix to stable storage.
    pub fn flush_header(&self) -> StoreResult<()> {
        self.map.flush_range(0, HEADER_SIZE as usize)?;
        Ok(())
    }

    fn checked_range(&self, offset: u64, len: usize) -> StoreResult<usize> {
        let end = offset.checked_add(len as u64);
        match end {
            Some(end) if end <= self.capacity => Ok(end as usize),
            _ => Err(StoreError::OutOfBounds {
                offset,
                len,
                capacity: self.capacity,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_creates_file_at_capacity() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("region.mmap");

        let store = MapStore::open(&path, 1024).unwrap();
        assert_eq!(store.capacity(), 1024);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 1024);
    }

    #[test]
    fn capacity_must_exceed_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("region.mmap");

        let result = MapStore::open(&path, HEADER_SIZE);
        assert!(matches!(result, Err(StoreError::InvalidCapacity { .. })));
    }

    #[test]
    fn new_header_is_zeroed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("region.mmap");

        let store = MapStore::open(&path, 1024).unwrap();
        assert_eq!(store.cursor(), 0);
        assert_eq!(store.day(), 0);
    }

    #[test]
    fn write_and_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("region.mmap");

        let mut store = MapStore::open(&path, 1024).unwrap();
        store.write_at(HEADER_SIZE, b"hello\n").unwrap();
        assert_eq!(store.read_at(HEADER_SIZE, 6).unwrap(), b"hello\n");
    }

    #[test]
    fn write_past_capacity_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("region.mmap");

        let mut store = MapStore::open(&path, 64).unwrap();
        let result = store.write_at(60, b"too long");
        assert!(matches!(result, Err(StoreError::OutOfBounds { .. })));
    }

    #[test]
    fn offset_overflow_is_out_of_bounds() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("region.mmap");

        let store = MapStore::open(&path, 64).unwrap();
        let result = store.read_at(u64::MAX, 8);
        assert!(matches!(result, Err(StoreError::OutOfBounds { .. })));
    }

    #[test]
    fn cursor_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("region.mmap");

        {
            let mut store = MapStore::open(&path, 1024).unwrap();
            store.set_cursor(123);
            store.flush().unwrap();
        }

        let store = MapStore::open(&path, 1024).unwrap();
        assert_eq!(store.cursor(), 123);
    }

    #[test]
    fn content_survives_reopen_without_truncation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("region.mmap");

        {
            let mut store = MapStore::open(&path, 1024).unwrap();
            store.write_at(HEADER_SIZE, b"durable").unwrap();
            store.flush().unwrap();
        }

        let store = MapStore::open(&path, 1024).unwrap();
        assert_eq!(store.read_at(HEADER_SIZE, 7).unwrap(), b"durable");
    }

    #[test]
    fn second_open_in_process_is_locked() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("region.mmap");

        let _store = MapStore::open(&path, 1024).unwrap();
        let result = MapStore::open(&path, 1024);
        assert!(matches!(result, Err(StoreError::Locked { .. })));
    }

    #[test]
    fn lock_released_on_drop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("region.mmap");

        {
            let _store = MapStore::open(&path, 1024).unwrap();
        }
        let _store = MapStore::open(&path, 1024).unwrap();
    }

    #[test]
    fn larger_existing_file_is_not_shrunk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("region.mmap");

        {
            let _store = MapStore::open(&path, 2048).unwrap();
        }

        let _store = MapStore::open(&path, 1024).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 2048);
    }
}
