//! Error types for `duckfuzz`.
//!
//! Encoding-time failures are scoped to one scenario: the corpus builder
//! counts them per reason and moves on. Decoding and container repair never
//! produce these errors for malformed input; only I/O on the underlying handle
//! can fail there.

use thiserror::Error;

/// Result type alias for `duckfuzz` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in `duckfuzz` operations.
///
/// Error codes follow the pattern `DFZ-XXX` so rejects can be grepped out of
/// corpus-build logs.
#[derive(Error, Debug)]
pub enum Error {
    /// Argument name is not part of the target's schema (DFZ-001).
    #[error("[DFZ-001] Unknown parameter '{0}' for this schema")]
    SchemaMismatch(String),

    /// Argument value does not fit the one-byte length prefix (DFZ-002).
    #[error("[DFZ-002] Value for '{name}' is {len} bytes, must be < 256")]
    ValueTooLong {
        /// Parameter name.
        name: String,
        /// UTF-8 byte length of the rejected value.
        len: usize,
    },

    /// Boolean argument text contains neither a true nor a false marker (DFZ-003).
    #[error("[DFZ-003] Invalid boolean literal '{value}' for '{name}'")]
    InvalidBooleanLiteral {
        /// Parameter name.
        name: String,
        /// Offending text.
        value: String,
    },

    /// More arguments than the one-byte count prefix can hold (DFZ-004).
    #[error("[DFZ-004] Scenario has {0} arguments, must be < 256")]
    TooManyArguments(usize),

    /// The same parameter name appears twice in a schema (DFZ-005).
    #[error("[DFZ-005] Duplicate parameter '{0}' in schema")]
    DuplicateParameter(String),

    /// Schema source cannot be turned into a parameter table (DFZ-006).
    #[error("[DFZ-006] Invalid schema: {0}")]
    InvalidSchema(String),

    /// No built-in schema exists for the requested reader function (DFZ-007).
    #[error("[DFZ-007] Unknown target function '{0}'")]
    UnknownTarget(String),

    /// Configuration error (DFZ-008).
    #[error("[DFZ-008] Configuration error: {0}")]
    Config(String),

    /// Serialization error (DFZ-009).
    #[error("[DFZ-009] Serialization error: {0}")]
    Serialization(String),

    /// IO error (DFZ-010).
    #[error("[DFZ-010] IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the error code (e.g., "DFZ-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::SchemaMismatch(_) => "DFZ-001",
            Self::ValueTooLong { .. } => "DFZ-002",
            Self::InvalidBooleanLiteral { .. } => "DFZ-003",
            Self::TooManyArguments(_) => "DFZ-004",
            Self::DuplicateParameter(_) => "DFZ-005",
            Self::InvalidSchema(_) => "DFZ-006",
            Self::UnknownTarget(_) => "DFZ-007",
            Self::Config(_) => "DFZ-008",
            Self::Serialization(_) => "DFZ-009",
            Self::Io(_) => "DFZ-010",
        }
    }

    /// Returns true if the error rejects a single scenario rather than the batch.
    #[must_use]
    pub const fn is_scenario_error(&self) -> bool {
        matches!(
            self,
            Self::SchemaMismatch(_)
                | Self::ValueTooLong { .. }
                | Self::InvalidBooleanLiteral { .. }
                | Self::TooManyArguments(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<crate::config::ConfigError> for Error {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
