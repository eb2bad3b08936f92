//! Paged database file repair engine.
//!
//! Three passes in a fixed order:
//!
//! 1. grow the file to `12288 + k * 262144` bytes
//! 2. rewrite magic, storage version and debug marker in the main header and
//!    re-checksum all three headers
//! 3. re-checksum every block
//!
//! Region content other than the main header fields is never touched.

use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{self, Read, Seek, Write};
use std::path::Path;
use tracing::{debug, info};

use super::{pad_to, read_at, stream_len, write_at};
use crate::checksum::region_checksum;
use crate::config::RepairConfig;
use crate::error::Result;
use crate::layout::{
    normalized_db_size, BLOCK_SIZE, CHECKSUM_SIZE, DB_MAGIC, DB_MAGIC_OFFSET, DEBUG_MARKER,
    HEADER_COUNT, HEADER_REGION_SIZE, STORAGE_VERSION, SUB_HEADER_SIZE,
};

/// Corrections made by one paged-file repair pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PagedRepairReport {
    /// File size after the pass.
    pub file_size: u64,
    /// Zero bytes appended to reach a valid size.
    pub bytes_padded: u64,
    /// Magic, version or marker bytes were rewritten.
    pub header_fields_fixed: bool,
    /// Header checksums rewritten (at most 3).
    pub header_checksums_fixed: u64,
    /// Blocks in the file.
    pub blocks: u64,
    /// Block checksums rewritten.
    pub block_checksums_fixed: u64,
}

impl PagedRepairReport {
    /// Returns true if the pass modified the file.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.bytes_padded > 0
            || self.header_fields_fixed
            || self.header_checksums_fixed > 0
            || self.block_checksums_fixed > 0
    }
}

/// Paged database file repair engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagedRepair {
    storage_version: u64,
    debug_marker: bool,
}

impl Default for PagedRepair {
    fn default() -> Self {
        Self {
            storage_version: STORAGE_VERSION,
            debug_marker: true,
        }
    }
}

impl PagedRepair {
    /// Creates an engine writing `storage_version`, and the `FUZZ` marker
    /// when `debug_marker` is set.
    #[must_use]
    pub fn new(storage_version: u64, debug_marker: bool) -> Self {
        Self {
            storage_version,
            debug_marker,
        }
    }

    /// Engine configured from the `[repair]` section.
    #[must_use]
    pub fn from_config(config: &RepairConfig) -> Self {
        Self::new(config.storage_version, config.debug_marker)
    }

    /// Main header bytes starting at [`DB_MAGIC_OFFSET`].
    fn header_fields(&self) -> Vec<u8> {
        let mut fields = Vec::with_capacity(DB_MAGIC.len() + 8 + DEBUG_MARKER.len());
        fields.extend_from_slice(DB_MAGIC);
        fields.extend_from_slice(&self.storage_version.to_le_bytes());
        if self.debug_marker {
            fields.extend_from_slice(DEBUG_MARKER);
        }
        fields
    }

    /// Repairs the database file behind `file` in place.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading, writing or seeking the handle fails.
    pub fn repair<F: Read + Write + Seek>(&self, file: &mut F) -> io::Result<PagedRepairReport> {
        let mut report = PagedRepairReport::default();

        let len = stream_len(file)?;
        let target = normalized_db_size(len);
        report.bytes_padded = pad_to(file, len, target)?;
        report.file_size = target;
        if report.bytes_padded > 0 {
            debug!(from = len, to = target, "Padding database file");
        }

        let fields = self.header_fields();
        let mut current = vec![0u8; fields.len()];
        read_at(file, DB_MAGIC_OFFSET, &mut current)?;
        if current != fields {
            debug!("Rewriting main header fields");
            write_at(file, DB_MAGIC_OFFSET, &fields)?;
            report.header_fields_fixed = true;
        }

        let mut region = vec![0u8; SUB_HEADER_SIZE as usize];
        for index in 0..HEADER_COUNT {
            if fix_region_checksum(file, index * SUB_HEADER_SIZE, &mut region)? {
                report.header_checksums_fixed += 1;
            }
        }

        report.blocks = (target - HEADER_REGION_SIZE) / BLOCK_SIZE;
        let mut block = vec![0u8; BLOCK_SIZE as usize];
        for index in 0..report.blocks {
            if fix_region_checksum(file, HEADER_REGION_SIZE + index * BLOCK_SIZE, &mut block)? {
                report.block_checksums_fixed += 1;
            }
        }

        Ok(report)
    }
}

/// Re-checksums the region of `buf.len()` bytes at `offset`.
///
/// Returns true if the stored checksum was rewritten.
fn fix_region_checksum<F: Read + Write + Seek>(
    file: &mut F,
    offset: u64,
    buf: &mut [u8],
) -> io::Result<bool> {
    buf.fill(0);
    read_at(file, offset, buf)?;
    let computed = region_checksum(buf);
    let mut stored = [0u8; CHECKSUM_SIZE];
    stored.copy_from_slice(&buf[..CHECKSUM_SIZE]);
    let stored = u64::from_le_bytes(stored);
    if stored == computed {
        return Ok(false);
    }
    debug!(offset, stored, computed, "Rewriting region checksum");
    write_at(file, offset, &computed.to_le_bytes())?;
    Ok(true)
}

/// Repairs the database file at `path` in place.
///
/// The file is held open read-write for the duration of the call.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] if the file cannot be opened or rewritten.
pub fn repair_paged_file<P: AsRef<Path>>(
    path: P,
    engine: &PagedRepair,
) -> Result<PagedRepairReport> {
    let path = path.as_ref();
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    let report = engine.repair(&mut file)?;
    file.sync_all()?;
    info!(
        path = %path.display(),
        file_size = report.file_size,
        blocks = report.blocks,
        block_checksums_fixed = report.block_checksums_fixed,
        "Database file repaired"
    );
    Ok(report)
}
