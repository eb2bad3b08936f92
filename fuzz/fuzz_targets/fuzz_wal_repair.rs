//! Fuzz target for WAL repair.
//!
//! Any byte string must repair without error into a log whose entries tile
//! the file exactly, and a second pass must change nothing.

#![no_main]

use duckfuzz_core::checksum::entry_checksum;
use duckfuzz_core::layout::{WAL_ENTRY_HEADER_SIZE, WAL_HEADER_MAGIC, WAL_HEADER_SIZE};
use duckfuzz_core::WalRepair;
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fn read_u64(bytes: &[u8], at: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[at..at + 8]);
    u64::from_le_bytes(word)
}

fuzz_target!(|data: &[u8]| {
    let engine = WalRepair::default();
    let mut file = Cursor::new(data.to_vec());
    engine.repair(&mut file).expect("in-memory repair cannot fail");
    let repaired = file.into_inner();

    assert_eq!(&repaired[..WAL_HEADER_SIZE as usize], &WAL_HEADER_MAGIC);
    let mut pos = WAL_HEADER_SIZE as usize;
    while pos < repaired.len() {
        let start = pos + WAL_ENTRY_HEADER_SIZE as usize;
        let end = start + read_u64(&repaired, pos) as usize;
        assert!(end <= repaired.len());
        assert_eq!(read_u64(&repaired, pos + 8), entry_checksum(&repaired[start..end]));
        pos = end;
    }

    let mut again = Cursor::new(repaired.clone());
    let report = engine.repair(&mut again).expect("in-memory repair cannot fail");
    assert!(!report.changed());
    assert_eq!(again.into_inner(), repaired);
});
