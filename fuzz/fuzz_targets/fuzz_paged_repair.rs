//! Fuzz target for paged database file repair.

#![no_main]

use duckfuzz_core::layout::{BLOCK_SIZE, HEADER_REGION_SIZE};
use duckfuzz_core::PagedRepair;
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let engine = PagedRepair::default();
    let mut file = Cursor::new(data.to_vec());
    let report = engine.repair(&mut file).expect("in-memory repair cannot fail");
    let repaired = file.into_inner();

    assert_eq!(report.file_size, repaired.len() as u64);
    assert!(repaired.len() as u64 >= HEADER_REGION_SIZE);
    assert_eq!((repaired.len() as u64 - HEADER_REGION_SIZE) % BLOCK_SIZE, 0);

    let mut again = Cursor::new(repaired);
    let second = engine.repair(&mut again).expect("in-memory repair cannot fail");
    assert!(!second.changed());
});
