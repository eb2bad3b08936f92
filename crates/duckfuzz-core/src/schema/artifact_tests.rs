//! Tests for the TOML schema artifact.

use super::artifact::*;
use super::{FileReader, ParamKind};

#[test]
fn test_artifact_from_toml() {
    // Arrange
    let toml = r#"
target = "read_json"

[[parameter]]
name = "format"
kind = "VARCHAR"

[[parameter]]
name = "maximum_depth"
kind = "INTEGER"
"#;

    // Act
    let artifact = SchemaArtifact::from_toml(toml).expect("parse");
    let schema = artifact.clone().into_schema().expect("schema");

    // Assert
    assert_eq!(artifact.target, Some(FileReader::ReadJson));
    assert_eq!(schema.lookup("maximum_depth").unwrap(), (1, ParamKind::Integer));
}

#[test]
fn test_artifact_without_target() {
    let toml = r#"
[[parameter]]
name = "binary_as_string"
kind = "BOOLEAN"
"#;

    let artifact = SchemaArtifact::from_toml(toml).expect("parse");

    assert!(artifact.target.is_none());
    assert_eq!(artifact.parameters.len(), 1);
}

#[test]
fn test_artifact_rejects_bad_kind() {
    let toml = r#"
[[parameter]]
name = "columns"
kind = "MAP"
"#;

    let err = SchemaArtifact::from_toml(toml).unwrap_err();

    assert_eq!(err.code(), "DFZ-009");
}

#[test]
fn test_empty_artifact_is_invalid_schema() {
    let artifact = SchemaArtifact::from_toml("target = \"read_csv\"").expect("parse");

    let err = artifact.into_schema().unwrap_err();

    assert_eq!(err.code(), "DFZ-006");
}

#[test]
fn test_builtin_schema_survives_artifact_round_trip() {
    for reader in FileReader::ALL {
        // Arrange
        let schema = reader.schema();

        // Act
        let toml = SchemaArtifact::from_schema(Some(reader), &schema)
            .to_toml()
            .expect("render");
        let restored = SchemaArtifact::from_toml(&toml).expect("parse");

        // Assert
        assert_eq!(restored.target, Some(reader));
        assert_eq!(restored.into_schema().expect("schema"), schema);
    }
}

#[test]
fn test_artifact_load_from_disk() {
    // Arrange
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("read_parquet.toml");
    let schema = FileReader::ReadParquet.schema();
    let text = SchemaArtifact::from_schema(Some(FileReader::ReadParquet), &schema)
        .to_toml()
        .expect("render");
    std::fs::write(&path, text).expect("write");

    // Act
    let loaded = SchemaArtifact::load(&path).expect("load");

    // Assert
    assert_eq!(loaded.parameters.len(), 26);
}
