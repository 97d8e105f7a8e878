//! Dump command: print the records of a region file.

use mmlog_core::{RegionResult, RegionSnapshot};
use std::path::Path;

/// Prints the records of the region file at `path`, most recent last.
///
/// With `limit`, only the last `limit` records are printed.
pub fn run(path: &Path, limit: Option<usize>, numbered: bool) -> RegionResult<()> {
    let snap = RegionSnapshot::load(path)?;

    let skip = match limit {
        Some(limit) => snap.records.len().saturating_sub(limit),
        None => 0,
    };

    for (index, record) in snap.records.iter().enumerate().skip(skip) {
        if numbered {
            println!("{index:6}  {record}");
        } else {
            println!("{record}");
        }
    }

    Ok(())
}
