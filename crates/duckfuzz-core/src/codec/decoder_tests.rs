//! Tests for the artifact decoder.

use super::decoder::*;
use super::encoder::encode_arguments;
use crate::schema::{FileReader, ParamKind, ParameterSchema};

fn mixed_schema() -> ParameterSchema {
    ParameterSchema::new([
        ("flag", ParamKind::Boolean),
        ("count", ParamKind::Integer),
        ("ratio", ParamKind::Double),
        ("text", ParamKind::Varchar),
    ])
    .expect("valid schema")
}

// -------------------------------------------------------------------------
// Well-formed streams
// -------------------------------------------------------------------------

#[test]
fn test_decode_header_and_skip_for_read_csv() {
    // Arrange
    let schema = FileReader::ReadCsv.schema();
    let stream = [
        0x02, 0x0E, 0x01, 0x30, 0x1B, 0x08, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];

    // Act
    let decoded = decode_artifact(&stream, &schema);

    // Assert
    assert_eq!(decoded.argument_string(), "header=false, skip=3");
    assert!(decoded.payload.is_empty());
    assert_eq!(decoded.cursor, stream.len());
    assert!(!decoded.truncated);
}

#[test]
fn test_decode_returns_payload_after_stream() {
    // Arrange
    let mut artifact = vec![0x01, 0x03, 0x02, b';', b';'];
    artifact.extend_from_slice(b"a;b\n1;2\n");

    // Act
    let decoded = decode_artifact(&artifact, &mixed_schema());

    // Assert
    assert_eq!(decoded.argument_string(), "text=;;");
    assert_eq!(decoded.payload, b"a;b\n1;2\n");
    assert_eq!(decoded.cursor, 5);
}

#[test]
fn test_decode_zero_count_whole_rest_is_payload() {
    let decoded = decode_artifact(&[0x00, 0xAA, 0xBB], &mixed_schema());

    assert!(decoded.arguments.is_empty());
    assert_eq!(decoded.payload, [0xAA, 0xBB]);
}

#[test]
fn test_decode_double_renders_fraction() {
    // Arrange
    let mut stream = vec![0x01, 0x02, 0x08];
    stream.extend_from_slice(&3.0f64.to_le_bytes());

    // Act
    let decoded = decode_artifact(&stream, &mixed_schema());

    // Assert
    assert_eq!(decoded.arguments[0].value, "3.0");
    assert_eq!(decoded.arguments[0].kind, ParamKind::Double);
}

#[test]
fn test_decode_non_finite_double_is_quoted() {
    // Arrange
    let schema = mixed_schema();
    let encode = |value: f64| {
        let mut stream = vec![0x01, 0x02, 0x08];
        stream.extend_from_slice(&value.to_le_bytes());
        stream
    };

    // Act
    let nan = decode_artifact(&encode(f64::NAN), &schema);
    let inf = decode_artifact(&encode(f64::INFINITY), &schema);
    let neg_inf = decode_artifact(&encode(f64::NEG_INFINITY), &schema);

    // Assert
    assert_eq!(nan.arguments[0].value, "'nan'");
    assert_eq!(inf.arguments[0].value, "'inf'");
    assert_eq!(neg_inf.arguments[0].value, "'-inf'");
    assert_eq!(
        inf.reproduction_query("read_json", "x.json"),
        "SELECT * FROM read_json('x.json', ratio='inf');"
    );
}

#[test]
fn test_decode_boolean_parity() {
    let schema = mixed_schema();

    let odd = decode_artifact(&[0x01, 0x00, 0x01, 0x07], &schema);
    let even = decode_artifact(&[0x01, 0x00, 0x01, 0xFE], &schema);

    assert_eq!(odd.arguments[0].value, "true");
    assert_eq!(even.arguments[0].value, "false");
}

// -------------------------------------------------------------------------
// Mutated and truncated streams
// -------------------------------------------------------------------------

#[test]
fn test_decode_empty_buffer() {
    let decoded = decode_artifact(&[], &mixed_schema());

    assert!(decoded.arguments.is_empty());
    assert!(decoded.payload.is_empty());
    assert_eq!(decoded.cursor, 0);
}

#[test]
fn test_decode_single_byte_stops_early() {
    // Arrange - claims 5 arguments, has none
    let decoded = decode_artifact(&[0x05], &mixed_schema());

    // Assert
    assert!(decoded.arguments.is_empty());
    assert!(decoded.truncated);
    assert_eq!(decoded.cursor, 1);
}

#[test]
fn test_decode_ordinal_wraps_modulo_schema_length() {
    // 0x06 % 4 == 2 -> "ratio"; 0x07 % 4 == 3 -> "text"
    let decoded = decode_artifact(&[0x02, 0x07, 0x01, b'z', 0x06, 0x00], &mixed_schema());

    assert_eq!(decoded.arguments[0].name, "text");
    assert_eq!(decoded.arguments[1].name, "ratio");
    assert_eq!(decoded.arguments[1].value, "0.1");
}

#[test]
fn test_decode_boolean_without_value_byte_is_true() {
    let decoded = decode_artifact(&[0x01, 0x00, 0x05], &mixed_schema());

    assert_eq!(decoded.arguments[0].value, "true");
    assert!(decoded.truncated);
    assert!(decoded.payload.is_empty());
}

#[test]
fn test_decode_short_integer_uses_sentinel() {
    // Declared length 4 < 8
    let decoded = decode_artifact(&[0x01, 0x01, 0x04, 1, 2, 3, 4, b'x'], &mixed_schema());

    assert_eq!(decoded.arguments[0].value, "42");
    assert_eq!(decoded.payload, b"x");
}

#[test]
fn test_decode_truncated_integer_uses_sentinel() {
    // Declared 8, only 5 present
    let decoded = decode_artifact(&[0x01, 0x01, 0x08, 9, 0, 0, 0, 0], &mixed_schema());

    assert_eq!(decoded.arguments[0].value, "42");
    assert!(decoded.truncated);
    assert_eq!(decoded.cursor, 8);
}

#[test]
fn test_decode_oversized_integer_reads_first_word() {
    // Declared 10: first 8 bytes are the value, cursor skips all 10
    let mut stream = vec![0x01, 0x01, 0x0A];
    stream.extend_from_slice(&7i64.to_le_bytes());
    stream.extend_from_slice(&[0xEE, 0xEE, b'p']);

    let decoded = decode_artifact(&stream, &mixed_schema());

    assert_eq!(decoded.arguments[0].value, "7");
    assert_eq!(decoded.payload, b"p");
}

#[test]
fn test_decode_varchar_drops_invalid_utf8() {
    let decoded = decode_artifact(&[0x01, 0x03, 0x04, b'a', 0xFF, 0xC3, b'b'], &mixed_schema());

    assert_eq!(decoded.arguments[0].value, "ab");
}

#[test]
fn test_decode_varchar_truncated_keeps_available_bytes() {
    let decoded = decode_artifact(&[0x01, 0x03, 0x10, b'h', b'i'], &mixed_schema());

    assert_eq!(decoded.arguments[0].value, "hi");
    assert!(decoded.truncated);
    assert_eq!(decoded.cursor, 5);
}

#[test]
fn test_decode_stops_when_one_byte_left() {
    // Second argument header is cut after its ordinal
    let decoded = decode_artifact(&[0x02, 0x00, 0x01, b'1', 0x03], &mixed_schema());

    assert_eq!(decoded.arguments.len(), 1);
    assert!(decoded.truncated);
    assert_eq!(decoded.payload, [0x03]);
}

// -------------------------------------------------------------------------
// Rendering
// -------------------------------------------------------------------------

#[test]
fn test_reproduction_query() {
    let schema = FileReader::ReadCsv.schema();
    let stream = [0x01, 0x0E, 0x01, b'1'];

    let decoded = decode_artifact(&stream, &schema);

    assert_eq!(
        decoded.reproduction_query("read_csv", "case_0.csv"),
        "SELECT * FROM read_csv('case_0.csv', header=true);"
    );
}

#[test]
fn test_reproduction_query_without_arguments() {
    let decoded = decode_artifact(&[0x00], &mixed_schema());

    assert_eq!(
        decoded.reproduction_query("read_json", "case_3.json"),
        "SELECT * FROM read_json('case_3.json');"
    );
}

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        /// Property: decoding never panics and the cursor stays in bounds
        #[test]
        fn prop_decode_is_total(buf in proptest::collection::vec(any::<u8>(), 0..10_000)) {
            let schema = FileReader::ReadCsv.schema();

            let decoded = decode_artifact(&buf, &schema);

            prop_assert!(decoded.cursor <= buf.len());
            prop_assert_eq!(&decoded.payload[..], &buf[decoded.cursor..]);
            prop_assert!(decoded.arguments.len() <= buf.first().map_or(0, |&c| usize::from(c)));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// Property: decode(encode(args) ++ payload) recovers canonical args and payload
        #[test]
        fn prop_encode_decode_round_trip(
            flag in proptest::option::of(any::<bool>()),
            count in proptest::option::of(any::<i64>()),
            ratio in proptest::option::of(-1.0e12f64..1.0e12),
            text in proptest::option::of("[a-zA-Z0-9 _;|]{0,200}"),
            payload in proptest::collection::vec(any::<u8>(), 0..256),
        ) {
            // Arrange
            let schema = mixed_schema();
            let mut arguments = BTreeMap::new();
            if let Some(v) = flag { arguments.insert("flag".to_string(), v.to_string()); }
            if let Some(v) = count { arguments.insert("count".to_string(), v.to_string()); }
            if let Some(v) = ratio { arguments.insert("ratio".to_string(), format!("{v:?}")); }
            if let Some(v) = text.clone() { arguments.insert("text".to_string(), v); }

            let mut artifact = encode_arguments(&arguments, &schema).expect("encode");
            artifact.extend_from_slice(&payload);

            // Act
            let decoded = decode_artifact(&artifact, &schema);

            // Assert
            let recovered: BTreeMap<String, String> = decoded
                .arguments
                .iter()
                .map(|a| (a.name.clone(), a.value.clone()))
                .collect();
            prop_assert_eq!(recovered, arguments);
            prop_assert_eq!(decoded.payload, payload);
            prop_assert!(!decoded.truncated);
        }
    }
}
