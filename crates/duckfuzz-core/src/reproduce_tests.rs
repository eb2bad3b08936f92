//! Tests for `reproduce` module

use std::fs;

use super::reproduce::*;
use crate::schema::FileReader;

#[test]
fn test_run_writes_cases_and_index() {
    // Arrange
    let findings = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    fs::write(findings.path().join("README.txt"), "fuzzer notes").expect("write");
    fs::write(
        findings.path().join("id:000000,sig:06"),
        [0x01, 0x0E, 0x01, 0x31, b'a', b'\n'],
    )
    .expect("write");
    fs::write(findings.path().join("id:000001,sig:11"), [0x00, b'z']).expect("write");

    // Act
    let cases = Reproducer::for_reader(FileReader::ReadCsv)
        .run(findings.path(), out.path())
        .expect("run");

    // Assert - README.txt sorts first and keeps its number
    assert_eq!(cases.len(), 2);
    assert_eq!(cases[0].file_name, "case_1.csv");
    assert_eq!(cases[0].arguments, "header=true");
    assert_eq!(
        cases[0].query,
        "SELECT * FROM read_csv('case_1.csv', header=true);"
    );
    assert_eq!(cases[1].file_name, "case_2.csv");
    assert_eq!(fs::read(out.path().join("case_1.csv")).expect("case"), b"a\n");
    assert_eq!(fs::read(out.path().join("case_2.csv")).expect("case"), b"z");
}

#[test]
fn test_index_round_trips_through_json() {
    // Arrange
    let findings = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    fs::write(findings.path().join("crash"), [0x00]).expect("write");

    // Act
    let cases = Reproducer::for_reader(FileReader::ReadJson)
        .run(findings.path(), out.path())
        .expect("run");
    let index = fs::read_to_string(out.path().join(REPRODUCTIONS_FILE)).expect("index");
    let parsed: Vec<Reproduction> = serde_json::from_str(&index).expect("json");

    // Assert
    assert_eq!(parsed, cases);
    assert_eq!(parsed[0].file_name, "case_0.json");
    assert!(parsed[0].arguments.is_empty());
}

#[test]
fn test_empty_artifact_reproduces_as_empty_case() {
    let findings = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    fs::write(findings.path().join("empty"), b"").expect("write");

    let cases = Reproducer::for_reader(FileReader::ReadParquet)
        .run(findings.path(), out.path())
        .expect("run");

    assert_eq!(cases[0].file_name, "case_0.parquet");
    assert!(fs::read(out.path().join("case_0.parquet")).expect("case").is_empty());
}

#[test]
fn test_missing_findings_dir_is_io_error() {
    let out = tempfile::tempdir().expect("tempdir");

    let err = Reproducer::for_reader(FileReader::ReadCsv)
        .run(out.path().join("nope"), out.path())
        .unwrap_err();

    assert_eq!(err.code(), "DFZ-010");
}

#[test]
fn test_decode_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("artifact");
    fs::write(&path, [0x01, 0x1B, 0x08, 5, 0, 0, 0, 0, 0, 0, 0]).expect("write");

    let decoded = Reproducer::for_reader(FileReader::ReadCsv)
        .decode_file(&path)
        .expect("decode");

    assert_eq!(decoded.argument_string(), "skip=5");
}
