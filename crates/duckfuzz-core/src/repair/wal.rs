//! WAL repair engine.
//!
//! One forward pass: fix the file header, then walk the entries from offset 8.
//! For every entry whose declared size overruns the file, either the size
//! field or the file is wrong:
//!
//! - declared size above the limit: the size field is corrupt, shrink it to
//!   what is left of the file
//! - otherwise: the file is truncated, zero-pad it to the declared size
//!
//! Afterwards the entry checksum is recomputed and rewritten when it differs.
//! Entries are never removed or reordered.

use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{self, Read, Seek, Write};
use std::path::Path;
use tracing::{debug, info};

use super::{pad_to, read_at, stream_len, write_at};
use crate::checksum::entry_checksum;
use crate::config::RepairConfig;
use crate::error::Result;
use crate::layout::{
    CHECKSUM_SIZE, WAL_ENTRY_HEADER_SIZE, WAL_HEADER_MAGIC, WAL_HEADER_SIZE, WAL_SIZE_FIELD_LIMIT,
    WAL_SIZE_LIMIT_MAX,
};

/// Corrections made by one WAL repair pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WalRepairReport {
    /// Entries walked.
    pub entries: u64,
    /// The file header was rewritten.
    pub header_fixed: bool,
    /// Size fields shrunk to fit the file.
    pub sizes_rewritten: u64,
    /// Entries completed by zero-padding the file.
    pub entries_padded: u64,
    /// Total zero bytes appended.
    pub bytes_padded: u64,
    /// Checksum fields rewritten.
    pub checksums_fixed: u64,
}

impl WalRepairReport {
    /// Returns true if the pass modified the file.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.header_fixed
            || self.sizes_rewritten > 0
            || self.bytes_padded > 0
            || self.checksums_fixed > 0
    }
}

/// WAL repair engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalRepair {
    size_limit: u64,
}

impl Default for WalRepair {
    fn default() -> Self {
        Self {
            size_limit: WAL_SIZE_FIELD_LIMIT,
        }
    }
}

impl WalRepair {
    /// Creates an engine that treats overrunning sizes above `size_limit` as
    /// corrupt size fields.
    ///
    /// The limit is capped at [`WAL_SIZE_LIMIT_MAX`].
    #[must_use]
    pub fn new(size_limit: u64) -> Self {
        Self {
            size_limit: size_limit.min(WAL_SIZE_LIMIT_MAX),
        }
    }

    /// Engine configured from the `[repair]` section.
    #[must_use]
    pub fn from_config(config: &RepairConfig) -> Self {
        Self::new(config.wal_size_limit)
    }

    /// Repairs the WAL behind `file` in place.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading, writing or seeking the handle fails.
    pub fn repair<F: Read + Write + Seek>(&self, file: &mut F) -> io::Result<WalRepairReport> {
        let mut report = WalRepairReport::default();
        let mut file_len = stream_len(file)?;

        let mut header = [0u8; WAL_HEADER_MAGIC.len()];
        let read = read_at(file, 0, &mut header)?;
        if read < header.len() || header != WAL_HEADER_MAGIC {
            debug!(found = ?&header[..read], "Rewriting WAL header");
            write_at(file, 0, &WAL_HEADER_MAGIC)?;
            file_len = file_len.max(WAL_HEADER_SIZE);
            report.header_fixed = true;
        }

        let mut pos = WAL_HEADER_SIZE;
        while pos < file_len {
            let size = self.fit_entry(file, pos, &mut file_len, &mut report)?;
            Self::fix_checksum(file, pos, size, &mut report)?;
            report.entries += 1;
            pos += WAL_ENTRY_HEADER_SIZE + size;
        }

        Ok(report)
    }

    /// Makes the entry at `pos` fit the file and returns its payload size.
    fn fit_entry<F: Read + Write + Seek>(
        &self,
        file: &mut F,
        pos: u64,
        file_len: &mut u64,
        report: &mut WalRepairReport,
    ) -> io::Result<u64> {
        let mut size_field = [0u8; 8];
        read_at(file, pos, &mut size_field)?;
        let declared = u64::from_le_bytes(size_field);

        let declared_end = pos
            .checked_add(WAL_ENTRY_HEADER_SIZE)
            .and_then(|start| start.checked_add(declared));
        if declared_end.is_some_and(|end| end <= *file_len) {
            return Ok(declared);
        }

        // An end that overflows u64 is a corrupt size field at any limit
        match declared_end {
            Some(end) if declared <= self.size_limit => {
                let added = pad_to(file, *file_len, end)?;
                debug!(offset = pos, declared, added, "Padding truncated WAL entry");
                *file_len = end;
                report.entries_padded += 1;
                report.bytes_padded += added;
                Ok(declared)
            }
            _ => {
                let room = *file_len - pos;
                let size = if room < WAL_ENTRY_HEADER_SIZE {
                    let added = pad_to(file, *file_len, pos + WAL_ENTRY_HEADER_SIZE)?;
                    *file_len += added;
                    report.bytes_padded += added;
                    0
                } else {
                    room - WAL_ENTRY_HEADER_SIZE
                };
                debug!(offset = pos, declared, size, "Shrinking WAL entry size field");
                write_at(file, pos, &size.to_le_bytes())?;
                report.sizes_rewritten += 1;
                Ok(size)
            }
        }
    }

    fn fix_checksum<F: Read + Write + Seek>(
        file: &mut F,
        pos: u64,
        size: u64,
        report: &mut WalRepairReport,
    ) -> io::Result<()> {
        let checksum_pos = pos + CHECKSUM_SIZE as u64;
        let mut stored = [0u8; CHECKSUM_SIZE];
        read_at(file, checksum_pos, &mut stored)?;

        let mut payload = vec![0u8; size as usize];
        read_at(file, pos + WAL_ENTRY_HEADER_SIZE, &mut payload)?;
        let computed = entry_checksum(&payload);

        let stored = u64::from_le_bytes(stored);
        if stored != computed {
            debug!(offset = pos, stored, computed, "Rewriting WAL entry checksum");
            write_at(file, checksum_pos, &computed.to_le_bytes())?;
            report.checksums_fixed += 1;
        }
        Ok(())
    }
}

/// Repairs the WAL file at `path` in place.
///
/// The file is held open read-write for the duration of the call.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] if the file cannot be opened or rewritten.
pub fn repair_wal_file<P: AsRef<Path>>(path: P, engine: &WalRepair) -> Result<WalRepairReport> {
    let path = path.as_ref();
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    let report = engine.repair(&mut file)?;
    file.sync_all()?;
    info!(
        path = %path.display(),
        entries = report.entries,
        checksums_fixed = report.checksums_fixed,
        sizes_rewritten = report.sizes_rewritten,
        bytes_padded = report.bytes_padded,
        "WAL repaired"
    );
    Ok(report)
}
