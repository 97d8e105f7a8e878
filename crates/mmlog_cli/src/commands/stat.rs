//! Stat command: header and usage information for a region file.

use mmlog_core::{RegionResult, RegionSnapshot, HEADER_SIZE};
use std::path::Path;

/// Prints header fields and usage for the region file at `path`.
pub fn run(path: &Path) -> RegionResult<()> {
    let snap = RegionSnapshot::load(path)?;

    println!("File      : {}", path.display());
    println!("Capacity  : {} bytes", snap.capacity);
    println!("Cursor    : {}", snap.cursor);
    println!(
        "Used      : {} of {} payload bytes",
        snap.used_bytes(),
        snap.capacity.saturating_sub(HEADER_SIZE)
    );
    println!("Records   : {}", snap.records.len());
    match snap.day {
        Some(day) => println!("Day       : {day}"),
        None => println!("Day       : (not rotating)"),
    }

    Ok(())
}
