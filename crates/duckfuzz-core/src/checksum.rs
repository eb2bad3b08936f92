//! Checksum engine shared by both repair engines.
//!
//! Mirrors the host program's block/WAL checksum bit for bit. Overflow is part
//! of the algorithm: every multiplication wraps modulo 2^64.

/// Initial accumulator of [`word_checksum`].
pub const CHECKSUM_SEED: u64 = 5381;

/// Multiplier applied to every 8-byte word.
pub const WORD_MULTIPLIER: u64 = 0xBF58_476D_1CE4_E5B9;

/// Seed of the tail hash.
pub const TAIL_SEED: u64 = 0xE17A_1465;

/// Mixing multiplier of the tail hash.
pub const TAIL_MULTIPLIER: u64 = 0xC6A4_A793_5BD1_E995;

const TAIL_SHIFT: u32 = 47;

/// Mixes a single word.
#[inline]
#[must_use]
pub const fn mix(word: u64) -> u64 {
    word.wrapping_mul(WORD_MULTIPLIER)
}

/// XOR-folds [`mix`] over every full little-endian word of `data`.
///
/// Trailing bytes that do not fill a word are ignored; see [`entry_checksum`]
/// for the variant that folds them in.
#[must_use]
pub fn word_checksum(data: &[u8]) -> u64 {
    data.chunks_exact(8).fold(CHECKSUM_SEED, |acc, chunk| {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        acc ^ mix(u64::from_le_bytes(word))
    })
}

/// Hashes a 1-7 byte remainder.
///
/// An empty tail still yields the seeded value; callers only use it when a
/// remainder exists. Input longer than 7 bytes is reduced to its first
/// `len % 8` bytes, matching the native switch on `len & 7`.
#[must_use]
pub fn tail_hash(tail: &[u8]) -> u64 {
    let len = tail.len() % 8;
    let tail = &tail[..len];
    let mut h = TAIL_SEED ^ (len as u64).wrapping_mul(TAIL_MULTIPLIER);
    for (i, &byte) in tail.iter().enumerate().skip(1).rev() {
        h ^= u64::from(byte) << (8 * i);
    }
    if let Some(&first) = tail.first() {
        h ^= u64::from(first);
        h = h.wrapping_mul(TAIL_MULTIPLIER);
    }
    h ^= h >> TAIL_SHIFT;
    h = h.wrapping_mul(TAIL_MULTIPLIER);
    h ^= h >> TAIL_SHIFT;
    h
}

/// Checksum of a WAL entry payload of any length.
#[must_use]
pub fn entry_checksum(payload: &[u8]) -> u64 {
    let full = payload.len() - payload.len() % 8;
    let base = word_checksum(&payload[..full]);
    if full == payload.len() {
        base
    } else {
        base ^ tail_hash(&payload[full..])
    }
}

/// Checksum of a paged-file region whose first 8 bytes hold the checksum.
///
/// Regions shorter than the checksum field hash as empty.
#[must_use]
pub fn region_checksum(region: &[u8]) -> u64 {
    word_checksum(region.get(crate::layout::CHECKSUM_SIZE..).unwrap_or_default())
}
