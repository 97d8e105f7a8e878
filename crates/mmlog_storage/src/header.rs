//! Header block layout.
//!
//! Every backing file starts with a fixed 16-byte header that is excluded
//! from the payload area:
//!
//! ```text
//! offset 0..8   write cursor (u64 LE, absolute file offset)
//! offset 8..16  day identifier (u64 LE, days from CE; 0 = unset)
//! ```
//!
//! A freshly created file is all zeroes, so a zero cursor marks an
//! uninitialized header. The first record is written at [`HEADER_SIZE`].

/// Size of the reserved header prefix in bytes.
pub const HEADER_SIZE: u64 = 16;

/// Byte offset of the write cursor within the header.
pub const CURSOR_OFFSET: usize = 0;

/// Byte offset of the day identifier within the header.
pub const DAY_OFFSET: usize = 8;

/// Reads the write cursor from a header slice.
///
/// # Panics
///
/// Panics if `bytes` is shorter than the header.
#[must_use]
pub fn read_cursor(bytes: &[u8]) -> u64 {
    read_u64(bytes, CURSOR_OFFSET)
}

/// Writes the cursor value into a header slice.
pub fn write_cursor(bytes: &mut [u8], cursor: u64) {
    bytes[CURSOR_OFFSET..CURSOR_OFFSET + 8].copy_from_slice(&cursor.to_le_bytes());
}

/// Reads the day identifier from a header slice.
#[must_use]
pub fn read_day(bytes: &[u8]) -> u64 {
    read_u64(bytes, DAY_OFFSET)
}

/// Writes the day identifier into a header slice.
pub fn write_day(bytes: &mut [u8], day: u64) {
    bytes[DAY_OFFSET..DAY_OFFSET + 8].copy_from_slice(&day.to_le_bytes());
}

fn read_u64(bytes: &[u8], offset: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_le_bytes(buf)
}
