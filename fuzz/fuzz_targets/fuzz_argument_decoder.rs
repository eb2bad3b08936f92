//! Fuzz target for the argument stream decoder.
//!
//! Decoding must be total: every byte buffer yields an artifact, the cursor
//! never passes the end of the buffer, and the payload is the tail after it.

#![no_main]

use duckfuzz_core::{decode_artifact, FileReader};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    for reader in FileReader::ALL {
        let schema = reader.schema();
        let decoded = decode_artifact(data, &schema);

        assert!(decoded.cursor <= data.len());
        assert_eq!(decoded.payload, &data[decoded.cursor..]);
        let _ = decoded.reproduction_query(reader.function_name(), "case_0");
    }
});
