//! Container repair engines.
//!
//! Fuzzers mutate container files without regard for their framing, so most
//! mutated inputs die in the host program's first consistency check. The
//! engines here rewrite just enough structure (magic bytes, size fields,
//! checksums, total size) for the input to reach the parsing logic behind
//! those checks.
//!
//! Both engines work on any `Read + Write + Seek` handle, process regions in
//! ascending offset order, only ever grow a file, and are idempotent: a second
//! pass over a repaired file changes nothing. The only failures are I/O errors
//! from the handle itself.

pub mod paged;
#[cfg(test)]
mod paged_tests;
pub mod wal;

pub use paged::{repair_paged_file, PagedRepair, PagedRepairReport};
pub use wal::{repair_wal_file, WalRepair, WalRepairReport};

use std::io::{self, Read, Seek, SeekFrom, Write};

/// Length of the underlying stream.
pub(crate) fn stream_len<F: Seek>(file: &mut F) -> io::Result<u64> {
    file.seek(SeekFrom::End(0))
}

/// Fills `buf` from `offset` as far as the stream allows.
///
/// Bytes past the end of the stream are left untouched, so a zeroed buffer
/// reads as zero-extended. Returns the number of bytes read.
pub(crate) fn read_at<F: Read + Seek>(
    file: &mut F,
    offset: u64,
    buf: &mut [u8],
) -> io::Result<usize> {
    file.seek(SeekFrom::Start(offset))?;
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

pub(crate) fn write_at<F: Write + Seek>(
    file: &mut F,
    offset: u64,
    bytes: &[u8],
) -> io::Result<()> {
    file.seek(SeekFrom::Start(offset))?;
    file.write_all(bytes)
}

/// Appends zero bytes until the stream is `target` bytes long.
///
/// Returns the number of bytes appended.
pub(crate) fn pad_to<F: Write + Seek>(
    file: &mut F,
    current_len: u64,
    target: u64,
) -> io::Result<u64> {
    if target <= current_len {
        return Ok(0);
    }
    let missing = target - current_len;
    file.seek(SeekFrom::Start(current_len))?;
    io::copy(&mut io::repeat(0).take(missing), file)?;
    Ok(missing)
}
