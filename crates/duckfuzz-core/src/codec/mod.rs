//! Argument stream codec.
//!
//! An argument stream is prepended to the data file a fuzz target reads:
//!
//! ```text
//! count: u8 | (ordinal: u8 | length: u8 | value: length bytes) × count | payload
//! ```
//!
//! | Kind      | Value bytes                         |
//! |-----------|-------------------------------------|
//! | `BOOLEAN` | ASCII `'0'` or `'1'`                |
//! | `INTEGER` | `i64` little-endian, 8 bytes        |
//! | `DOUBLE`  | `f64` little-endian IEEE-754, 8 bytes |
//! | `VARCHAR` | raw UTF-8                           |
//!
//! The [`decoder`] mirrors the native decoder embedded in the fuzz target and
//! never fails; the [`encoder`] rejects scenarios that would not survive the
//! trip through it.

pub mod decoder;
#[cfg(test)]
mod decoder_tests;
pub mod encoder;

pub use decoder::{decode_artifact, DecodedArgument, DecodedArtifact};
pub use encoder::encode_arguments;

/// Largest argument count and value length the one-byte prefixes can carry.
pub const MAX_PREFIX_VALUE: usize = u8::MAX as usize;

/// Width of an encoded `INTEGER` or `DOUBLE`.
pub const NUMERIC_WIDTH: usize = 8;

/// Substituted when an `INTEGER` value cannot be encoded or decoded.
pub const INTEGER_SENTINEL: i64 = 42;

/// Substituted when a `DOUBLE` value cannot be encoded or decoded.
pub const DOUBLE_SENTINEL: f64 = 0.1;
