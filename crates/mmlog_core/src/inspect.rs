//! Read-only inspection of region backing files.
//!
//! Loads a backing file with plain file reads - no mapping, no lock - so
//! a live region can be examined while its owner keeps appending.

use crate::error::{RegionError, RegionResult};
use crate::rotation;
use chrono::NaiveDate;
use mmlog_storage::{header, HEADER_SIZE};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Point-in-time view of one backing file: header fields plus the decoded
/// record list up to the persisted cursor.
#[derive(Debug, Clone)]
pub struct RegionSnapshot {
    /// Length of the backing file in bytes.
    pub capacity: u64,
    /// Persisted write cursor (absolute file offset).
    pub cursor: u64,
    /// Day the file was created for, if it belongs to a rotating region.
    pub day: Option<NaiveDate>,
    /// Records between the header and the cursor, in append order.
    /// Non-UTF-8 bytes are replaced lossily.
    pub records: Vec<String>,
}

impl RegionSnapshot {
    /// Loads a snapshot of the backing file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::Corrupted`] if the file is shorter than the
    /// header or the persisted cursor falls outside the file, and
    /// [`RegionError::Io`] on read failures.
    pub fn load(path: &Path) -> RegionResult<Self> {
        let mut file = File::open(path)?;
        let capacity = file.metadata()?.len();

        if capacity < HEADER_SIZE {
            return Err(RegionError::corrupted(format!(
                "file is {capacity} bytes, smaller than the {HEADER_SIZE} byte header"
            )));
        }

        let mut header_buf = [0u8; HEADER_SIZE as usize];
        file.read_exact(&mut header_buf)?;
        let cursor = header::read_cursor(&header_buf);
        let day = rotation::day_from_header(header::read_day(&header_buf));

        // A zero cursor is a created-but-never-opened file: no records.
        if cursor == 0 {
            return Ok(Self {
                capacity,
                cursor,
                day,
                records: Vec::new(),
            });
        }

        if cursor < HEADER_SIZE || cursor > capacity {
            return Err(RegionError::corrupted(format!(
                "cursor {cursor} outside [{HEADER_SIZE}, {capacity}]"
            )));
        }

        let mut payload = vec![0u8; (cursor - HEADER_SIZE) as usize];
        file.read_exact(&mut payload)?;

        Ok(Self {
            capacity,
            cursor,
            day,
            records: split_records(&payload),
        })
    }

    /// Payload bytes in use (between the header and the cursor).
    #[must_use]
    pub fn used_bytes(&self) -> u64 {
        self.cursor.saturating_sub(HEADER_SIZE)
    }
}

/// Splits the payload on the record delimiter.
///
/// Every complete record ends with `\n`, so a trailing delimiter produces
/// one empty fragment at the end which is not a record. A payload that
/// does not end with `\n` (foreign truncation) keeps its partial tail as
/// the last entry.
fn split_records(payload: &[u8]) -> Vec<String> {
    if payload.is_empty() {
        return Vec::new();
    }

    let mut records: Vec<String> = payload
        .split(|&b| b == b'\n')
        .map(|raw| String::from_utf8_lossy(raw).into_owned())
        .collect();
    if payload.ends_with(b"\n") {
        records.pop();
    }
    records
}
