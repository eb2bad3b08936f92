//! Tests for the paged database file repair engine.

use std::io::Cursor;

use super::paged::*;
use crate::checksum::region_checksum;
use crate::layout::{BLOCK_SIZE, HEADER_REGION_SIZE, SUB_HEADER_SIZE};

const HEADER: usize = HEADER_REGION_SIZE as usize;
const BLOCK: usize = BLOCK_SIZE as usize;
const SUB: usize = SUB_HEADER_SIZE as usize;

fn repair_with(engine: PagedRepair, bytes: Vec<u8>) -> (Vec<u8>, PagedRepairReport) {
    let mut cursor = Cursor::new(bytes);
    let report = engine.repair(&mut cursor).expect("repair");
    (cursor.into_inner(), report)
}

fn repair(bytes: Vec<u8>) -> (Vec<u8>, PagedRepairReport) {
    repair_with(PagedRepair::default(), bytes)
}

fn stored_checksum(bytes: &[u8], offset: usize) -> u64 {
    u64::from_le_bytes(bytes[offset..offset + 8].try_into().expect("8 bytes"))
}

/// Asserts size invariant and every region checksum.
fn assert_consistent(bytes: &[u8]) {
    assert!(bytes.len() >= HEADER);
    assert_eq!((bytes.len() - HEADER) % BLOCK, 0);
    for offset in (0..HEADER).step_by(SUB) {
        let region = &bytes[offset..offset + SUB];
        assert_eq!(stored_checksum(bytes, offset), region_checksum(region));
    }
    for offset in (HEADER..bytes.len()).step_by(BLOCK) {
        let region = &bytes[offset..offset + BLOCK];
        assert_eq!(stored_checksum(bytes, offset), region_checksum(region));
    }
}

// -------------------------------------------------------------------------
// Size normalization
// -------------------------------------------------------------------------

#[test]
fn test_empty_file_becomes_header_region() {
    // Arrange & Act
    let (repaired, report) = repair(Vec::new());

    // Assert
    assert_eq!(repaired.len(), HEADER);
    assert_eq!(report.bytes_padded, HEADER as u64);
    assert_eq!(report.blocks, 0);
    assert_consistent(&repaired);
}

#[test]
fn test_one_byte_past_header_adds_a_block() {
    let (repaired, report) = repair(vec![0x42; HEADER + 1]);

    assert_eq!(repaired.len(), HEADER + BLOCK);
    assert_eq!(report.blocks, 1);
    assert_eq!(report.file_size, (HEADER + BLOCK) as u64);
    assert_consistent(&repaired);
}

#[test]
fn test_valid_size_is_not_padded() {
    let (repaired, report) = repair(vec![0u8; HEADER + 2 * BLOCK]);

    assert_eq!(repaired.len(), HEADER + 2 * BLOCK);
    assert_eq!(report.bytes_padded, 0);
    assert_eq!(report.blocks, 2);
}

#[test]
fn test_padding_preserves_existing_content() {
    // Arrange
    let original: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();

    // Act
    let (repaired, _) = repair(original.clone());

    // Assert - untouched outside header fields and checksums
    assert_eq!(&repaired[24..SUB], &original[24..SUB]);
    assert_eq!(&repaired[SUB + 8..5000], &original[SUB + 8..5000]);
    assert!(repaired[5000..].iter().enumerate().all(|(i, &b)| {
        let offset = 5000 + i;
        b == 0 || (SUB * 2..SUB * 2 + 8).contains(&offset)
    }));
}

// -------------------------------------------------------------------------
// Header fields
// -------------------------------------------------------------------------

#[test]
fn test_header_fields_are_written() {
    let (repaired, report) = repair(vec![0u8; HEADER]);

    assert!(report.header_fields_fixed);
    assert_eq!(&repaired[8..12], b"DUCK");
    assert_eq!(&repaired[12..20], &64u64.to_le_bytes());
    assert_eq!(&repaired[20..24], b"FUZZ");
}

#[test]
fn test_debug_marker_can_be_disabled() {
    let (repaired, _) = repair_with(PagedRepair::new(65, false), vec![0u8; HEADER]);

    assert_eq!(&repaired[12..20], &65u64.to_le_bytes());
    assert_eq!(&repaired[20..24], &[0, 0, 0, 0]);
    assert_consistent(&repaired);
}

#[test]
fn test_all_three_header_checksums_fixed() {
    let (_, report) = repair(vec![0xFFu8; HEADER]);

    assert_eq!(report.header_checksums_fixed, 3);
}

// -------------------------------------------------------------------------
// Block checksums
// -------------------------------------------------------------------------

#[test]
fn test_mutated_block_checksum_is_fixed() {
    // Arrange
    let (mut db, _) = repair(vec![0u8; HEADER + 3 * BLOCK]);
    db[HEADER + BLOCK + 1000] ^= 0x10;

    // Act
    let (repaired, report) = repair(db);

    // Assert
    assert_eq!(report.block_checksums_fixed, 1);
    assert_eq!(report.header_checksums_fixed, 0);
    assert!(!report.header_fields_fixed);
    assert_consistent(&repaired);
}

#[test]
fn test_repair_is_idempotent() {
    // Arrange
    let mut bytes = vec![0u8; HEADER + BLOCK + 777];
    for (i, b) in bytes.iter_mut().enumerate() {
        *b = (i.wrapping_mul(31) % 256) as u8;
    }

    // Act
    let (once, first) = repair(bytes);
    let (twice, second) = repair(once.clone());

    // Assert
    assert!(first.changed());
    assert!(!second.changed());
    assert_eq!(once, twice);
}

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Property: size invariant holds and every region checksum is valid
        #[test]
        fn prop_paged_repair_consistent(
            bytes in proptest::collection::vec(any::<u8>(), 0..20_000)
        ) {
            let original_len = bytes.len();

            let (repaired, report) = repair(bytes);

            prop_assert!(repaired.len() >= original_len);
            prop_assert_eq!(report.file_size, repaired.len() as u64);
            assert_consistent(&repaired);
        }
    }
}
