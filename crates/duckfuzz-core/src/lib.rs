//! # `duckfuzz` Core
//!
//! Corpus encoding, crash decoding and container repair for fuzzing the
//! structured-data file readers of an analytical database.
//!
//! ## Features
//!
//! - **Argument codec**: typed, ordinal-stable argument streams prepended to
//!   data files, byte-compatible with the decoder inside the fuzz target
//! - **Total decoder**: any crash artifact decodes to a reproduction query
//! - **WAL repair**: fixes header, size fields and entry checksums
//! - **Paged-file repair**: fixes file size, header fields and page checksums
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use duckfuzz_core::{decode_artifact, encode_arguments, FileReader};
//!
//! let schema = FileReader::ReadCsv.schema();
//! let mut args = BTreeMap::new();
//! args.insert("header".to_string(), "false".to_string());
//! args.insert("skip".to_string(), "3".to_string());
//!
//! let mut artifact = encode_arguments(&args, &schema)?;
//! artifact.extend_from_slice(b"a,b\n1,2\n");
//!
//! let decoded = decode_artifact(&artifact, &schema);
//! assert_eq!(decoded.argument_string(), "header=false, skip=3");
//! assert_eq!(decoded.payload, b"a,b\n1,2\n");
//! # Ok::<(), duckfuzz_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
// Ordinals and length prefixes are bounded by schema validation before any
// narrowing cast.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

pub mod checksum;
pub mod codec;
pub mod config;
pub mod corpus;
pub mod error;
pub mod layout;
pub mod repair;
pub mod reproduce;
#[cfg(test)]
mod reproduce_tests;
pub mod schema;

pub use codec::{decode_artifact, encode_arguments, DecodedArgument, DecodedArtifact};
pub use config::{ConfigError, DuckfuzzConfig};
pub use corpus::{CorpusBuilder, CorpusReport, Scenario};
pub use error::{Error, Result};
pub use repair::{
    repair_paged_file, repair_wal_file, PagedRepair, PagedRepairReport, WalRepair,
    WalRepairReport,
};
pub use reproduce::{Reproducer, Reproduction};
pub use schema::{FileReader, ParamKind, ParameterSchema};
