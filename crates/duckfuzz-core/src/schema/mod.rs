//! Parameter schemas of the fuzzed reader functions.
//!
//! A schema is the ordered list of `(name, kind)` pairs a reader function
//! accepts. The position of a parameter in that list is its ordinal, and the
//! ordinal is what goes on the wire. Both this crate and the native decoder
//! inside the fuzz target must enumerate the same list in the same order:
//! reordering or inserting parameters invalidates every corpus file and crash
//! artifact captured with the old table.
//!
//! # Sources
//!
//! - [`FileReader::schema`]: built-in canonical tables
//! - [`declaration`]: `std::make_tuple("name", "TYPE")` declaration text
//! - [`artifact`]: machine-readable TOML schema artifact

pub mod artifact;
#[cfg(test)]
mod artifact_tests;
mod builtin;
pub mod declaration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Largest schema whose ordinals fit in the one-byte wire field.
pub const MAX_PARAMETERS: usize = 256;

/// Wire type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParamKind {
    /// Encoded as ASCII `'0'` / `'1'`.
    Boolean,
    /// Encoded as 8-byte little-endian `i64`.
    Integer,
    /// Encoded as 8-byte IEEE-754 `f64`.
    Double,
    /// Raw UTF-8.
    Varchar,
}

impl ParamKind {
    /// Type name as written in schema sources.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Integer => "INTEGER",
            Self::Double => "DOUBLE",
            Self::Varchar => "VARCHAR",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BOOLEAN" => Ok(Self::Boolean),
            "INTEGER" => Ok(Self::Integer),
            "DOUBLE" => Ok(Self::Double),
            "VARCHAR" => Ok(Self::Varchar),
            other => Err(Error::InvalidSchema(format!(
                "unsupported parameter type '{other}'"
            ))),
        }
    }
}

/// One entry of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter<'a> {
    /// Parameter name as stored in the schema.
    pub name: &'a str,
    /// Wire type.
    pub kind: ParamKind,
    /// Zero-based position in the schema, used as the wire identifier.
    pub ordinal: u8,
}

/// Ordered, de-duplicated parameter table of one reader function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSchema {
    params: IndexMap<String, ParamKind>,
}

impl ParameterSchema {
    /// Builds a schema from parameters in canonical order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSchema`] for an empty list or one with more than
    /// [`MAX_PARAMETERS`] entries, and [`Error::DuplicateParameter`] when a
    /// name repeats.
    pub fn new<I, S>(params: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, ParamKind)>,
        S: Into<String>,
    {
        let mut map = IndexMap::new();
        for (name, kind) in params {
            let name = name.into();
            if map.contains_key(&name) {
                return Err(Error::DuplicateParameter(name));
            }
            map.insert(name, kind);
        }
        if map.is_empty() {
            return Err(Error::InvalidSchema("schema has no parameters".to_string()));
        }
        if map.len() > MAX_PARAMETERS {
            return Err(Error::InvalidSchema(format!(
                "schema has {} parameters, at most {MAX_PARAMETERS} fit the ordinal byte",
                map.len()
            )));
        }
        Ok(Self { params: map })
    }

    /// Built-in tables are checked by tests instead of at runtime.
    fn from_builtin(table: &[(&str, ParamKind)]) -> Self {
        Self {
            params: table
                .iter()
                .map(|&(name, kind)| (name.to_string(), kind))
                .collect(),
        }
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns true if the schema has no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Resolves a parameter name to its ordinal and kind.
    ///
    /// Lookup is exact: names are matched as stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaMismatch`] for an unknown name.
    pub fn lookup(&self, name: &str) -> Result<(u8, ParamKind)> {
        match self.params.get_full(name) {
            Some((ordinal, _, &kind)) => Ok((ordinal as u8, kind)),
            None => Err(Error::SchemaMismatch(name.to_string())),
        }
    }

    /// Returns the parameter at `ordinal`, if any.
    #[must_use]
    pub fn get(&self, ordinal: usize) -> Option<Parameter<'_>> {
        self.params
            .get_index(ordinal)
            .map(|(name, &kind)| Parameter {
                name,
                kind,
                ordinal: ordinal as u8,
            })
    }

    /// Resolves a raw ordinal byte read off the wire.
    ///
    /// Out-of-range bytes wrap modulo the schema length the same way the
    /// native decoder does, so a bit-flipped ordinal still names a parameter.
    #[must_use]
    pub fn resolve_wire(&self, raw: u8) -> Parameter<'_> {
        let ordinal = usize::from(raw) % self.params.len();
        let (name, &kind) = self
            .params
            .get_index(ordinal)
            .unwrap_or_else(|| unreachable!("ordinal reduced modulo schema length"));
        Parameter {
            name,
            kind,
            ordinal: ordinal as u8,
        }
    }

    /// Iterates parameters in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = Parameter<'_>> {
        self.params
            .iter()
            .enumerate()
            .map(|(ordinal, (name, &kind))| Parameter {
                name,
                kind,
                ordinal: ordinal as u8,
            })
    }
}

/// Reader functions with a built-in schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileReader {
    /// `read_csv(...)`
    ReadCsv,
    /// `read_json(...)`
    ReadJson,
    /// `read_parquet(...)`
    ReadParquet,
}

impl FileReader {
    /// All supported readers.
    pub const ALL: [Self; 3] = [Self::ReadCsv, Self::ReadJson, Self::ReadParquet];

    /// SQL function name.
    #[must_use]
    pub const fn function_name(&self) -> &'static str {
        match self {
            Self::ReadCsv => "read_csv",
            Self::ReadJson => "read_json",
            Self::ReadParquet => "read_parquet",
        }
    }

    /// File extension of reproduced data files, including the dot.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::ReadCsv => ".csv",
            Self::ReadJson => ".json",
            Self::ReadParquet => ".parquet",
        }
    }

    /// Canonical schema of this reader.
    #[must_use]
    pub fn schema(&self) -> ParameterSchema {
        ParameterSchema::from_builtin(match self {
            Self::ReadCsv => builtin::READ_CSV,
            Self::ReadJson => builtin::READ_JSON,
            Self::ReadParquet => builtin::READ_PARQUET,
        })
    }
}

impl fmt::Display for FileReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.function_name())
    }
}

impl FromStr for FileReader {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|reader| reader.function_name() == s)
            .ok_or_else(|| Error::UnknownTarget(s.to_string()))
    }
}

#[cfg(test)]
pub(crate) fn builtin_table(reader: FileReader) -> &'static [(&'static str, ParamKind)] {
    match reader {
        FileReader::ReadCsv => builtin::READ_CSV,
        FileReader::ReadJson => builtin::READ_JSON,
        FileReader::ReadParquet => builtin::READ_PARQUET,
    }
}
