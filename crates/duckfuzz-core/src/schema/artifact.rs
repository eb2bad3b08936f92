//! Machine-readable schema artifact.
//!
//! One TOML file per target that both this crate and the native decoder
//! generator consume, so the two parameter tables cannot drift apart:
//!
//! ```toml
//! target = "read_csv"
//!
//! [[parameter]]
//! name = "all_varchar"
//! kind = "BOOLEAN"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{FileReader, ParamKind, ParameterSchema};
use crate::error::{Error, Result};

/// One `[[parameter]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterEntry {
    /// Parameter name.
    pub name: String,
    /// Wire type.
    pub kind: ParamKind,
}

/// Serialized schema, parameters in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaArtifact {
    /// Reader function the table belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<FileReader>,
    /// Parameters in wire order.
    #[serde(rename = "parameter", default)]
    pub parameters: Vec<ParameterEntry>,
}

impl SchemaArtifact {
    /// Captures a schema.
    #[must_use]
    pub fn from_schema(target: Option<FileReader>, schema: &ParameterSchema) -> Self {
        Self {
            target,
            parameters: schema
                .iter()
                .map(|p| ParameterEntry {
                    name: p.name.to_string(),
                    kind: p.kind,
                })
                .collect(),
        }
    }

    /// Parses an artifact from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] on malformed TOML.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Reads an artifact from disk.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors or malformed TOML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Renders the artifact as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if rendering fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Validates the table and turns it into a schema.
    ///
    /// # Errors
    ///
    /// Fails on an empty table, duplicates, or too many parameters.
    pub fn into_schema(self) -> Result<ParameterSchema> {
        ParameterSchema::new(self.parameters.into_iter().map(|p| (p.name, p.kind)))
    }
}
