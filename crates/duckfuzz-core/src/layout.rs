//! On-disk layout constants for the containers the repair engines heal.
//!
//! # WAL
//!
//! ```text
//! [Header: 64 00 62 65 00 02 FF FF]
//! [Entry: size u64 LE | checksum u64 LE | payload (size bytes)] × N
//! ```
//!
//! # Paged database file
//!
//! ```text
//! [Main header 4 KiB: checksum | "DUCK" @8 | version u64 LE | "FUZZ"]
//! [Table header 4 KiB: checksum | ...]
//! [Table header 4 KiB: checksum | ...]
//! [Block 256 KiB: checksum | ...] × N
//! ```
//!
//! Every checksummed region starts with its 8-byte checksum, which covers the
//! remainder of the region.

/// Fixed 8-byte WAL file header: wal_type field, WAL version marker, version
/// field, version number 2 and the header block terminator.
pub const WAL_HEADER_MAGIC: [u8; 8] = [0x64, 0x00, 0x62, 0x65, 0x00, 0x02, 0xFF, 0xFF];

/// Offset of the first WAL entry.
pub const WAL_HEADER_SIZE: u64 = WAL_HEADER_MAGIC.len() as u64;

/// Size + checksum fields preceding every WAL entry payload.
pub const WAL_ENTRY_HEADER_SIZE: u64 = 16;

/// A declared entry size above this that overruns the file is taken to be a
/// corrupted size field instead of a truncated file.
pub const WAL_SIZE_FIELD_LIMIT: u64 = 40_000;

/// Largest configurable size-field limit. A truncated entry is never padded
/// beyond this many payload bytes.
pub const WAL_SIZE_LIMIT_MAX: u64 = 1 << 30;

/// Width of every checksum field.
pub const CHECKSUM_SIZE: usize = 8;

/// Size of each of the three database headers.
pub const SUB_HEADER_SIZE: u64 = 4096;

/// Number of headers at the start of a database file.
pub const HEADER_COUNT: u64 = 3;

/// Total header region preceding the first block.
pub const HEADER_REGION_SIZE: u64 = SUB_HEADER_SIZE * HEADER_COUNT;

/// Size of one storage block.
pub const BLOCK_SIZE: u64 = 256 * 1024;

/// Magic token in the main header.
pub const DB_MAGIC: &[u8; 4] = b"DUCK";

/// Offset of [`DB_MAGIC`] inside the main header, right after its checksum.
pub const DB_MAGIC_OFFSET: u64 = CHECKSUM_SIZE as u64;

/// Storage version written after the magic token.
pub const STORAGE_VERSION: u64 = 64;

/// Debug marker written after the storage version so repaired files are
/// recognizable in a hex dump.
pub const DEBUG_MARKER: &[u8; 4] = b"FUZZ";

/// Smallest valid database size that is `>= len`:
/// `HEADER_REGION_SIZE + k * BLOCK_SIZE` for integer `k >= 0`.
#[must_use]
pub fn normalized_db_size(len: u64) -> u64 {
    if len <= HEADER_REGION_SIZE {
        return HEADER_REGION_SIZE;
    }
    let blocks = (len - HEADER_REGION_SIZE).div_ceil(BLOCK_SIZE);
    HEADER_REGION_SIZE + blocks * BLOCK_SIZE
}
