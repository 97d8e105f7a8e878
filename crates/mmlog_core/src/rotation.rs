//! Daily rotation: day identity and dated file naming.
//!
//! A rotating region derives its active file name from the current
//! calendar day (UTC). The day is persisted in the backing file's header
//! as days-from-CE so a restarted process can tell which day the file was
//! created for. Rotation never deletes old daily files; retention is an
//! external concern.

use chrono::{Datelike, NaiveDate, Utc};
use std::path::{Path, PathBuf};

/// File name of a non-rotating region's single backing file.
pub(crate) const REGION_FILE: &str = "region.mmap";

/// Returns the current calendar day (UTC).
pub(crate) fn current_day() -> NaiveDate {
    Utc::now().date_naive()
}

/// Encodes a day for the header's day-identifier field.
pub(crate) fn day_to_header(day: NaiveDate) -> u64 {
    // Positive for any date after year 0; 0 stays "unset".
    u64::try_from(day.num_days_from_ce()).unwrap_or(0)
}

/// Decodes the header's day-identifier field (0 or garbage yields `None`).
pub(crate) fn day_from_header(raw: u64) -> Option<NaiveDate> {
    let days = i32::try_from(raw).ok()?;
    if days == 0 {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(days)
}

/// File name for a rotating region's backing file on the given day.
pub(crate) fn dated_file_name(day: NaiveDate) -> String {
    format!("region-{}.mmap", day.format("%Y-%m-%d"))
}

/// Path of the active backing file within the stream directory.
pub(crate) fn active_path(dir: &Path, rotate_daily: bool, day: NaiveDate) -> PathBuf {
    if rotate_daily {
        dir.join(dated_file_name(day))
    } else {
        dir.join(REGION_FILE)
    }
}
