//! Fuzz target for encoder/decoder agreement.
//!
//! Arbitrary argument maps are encoded against the CSV schema; whatever the
//! encoder accepts must decode back to the same names followed by the payload.

#![no_main]

use arbitrary::Arbitrary;
use duckfuzz_core::{decode_artifact, encode_arguments, FileReader};
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeMap;

#[derive(Debug, Arbitrary)]
struct Input {
    /// Ordinals into the schema, mapped to parameter names
    picks: Vec<(u8, String)>,
    payload: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let schema = FileReader::ReadCsv.schema();
    let arguments: BTreeMap<String, String> = input
        .picks
        .into_iter()
        .map(|(raw, value)| (schema.resolve_wire(raw).name.to_string(), value))
        .collect();

    let Ok(mut stream) = encode_arguments(&arguments, &schema) else {
        return;
    };
    let header_len = stream.len();
    stream.extend_from_slice(&input.payload);

    let decoded = decode_artifact(&stream, &schema);
    let names: Vec<&str> = decoded.arguments.iter().map(|a| a.name.as_str()).collect();
    let expected: Vec<&str> = arguments.keys().map(String::as_str).collect();

    assert!(!decoded.truncated);
    assert_eq!(decoded.cursor, header_len);
    assert_eq!(names, expected);
    assert_eq!(decoded.payload, input.payload.as_slice());
});
