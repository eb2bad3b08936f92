//! Crash artifact decoder.
//!
//! Decoding is total: any byte string yields a [`DecodedArtifact`]. Missing
//! bytes are filled with sentinels, out-of-range ordinals wrap modulo the
//! schema length, and the cursor always advances by the declared length so
//! the payload boundary matches what the fuzz target saw.

use std::fmt;

use super::{DOUBLE_SENTINEL, INTEGER_SENTINEL, NUMERIC_WIDTH};
use crate::schema::{ParamKind, ParameterSchema};

/// One recovered `name=value` assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedArgument {
    /// Parameter name after ordinal wrap-around.
    pub name: String,
    /// Wire type the value was decoded as.
    pub kind: ParamKind,
    /// Value rendered as SQL argument text.
    pub value: String,
}

impl fmt::Display for DecodedArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Best-effort decoding of one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedArtifact {
    /// Arguments in stream order.
    pub arguments: Vec<DecodedArgument>,
    /// Bytes after the argument stream: the original data file.
    pub payload: Vec<u8>,
    /// Offset where the payload starts, never past the end of the input.
    pub cursor: usize,
    /// The stream ended before its declared argument count or last value.
    pub truncated: bool,
}

impl DecodedArtifact {
    /// Arguments as `name=value` joined by `", "`.
    #[must_use]
    pub fn argument_string(&self) -> String {
        self.arguments
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// SQL statement that replays the artifact against `data_file`.
    #[must_use]
    pub fn reproduction_query(&self, function_name: &str, data_file: &str) -> String {
        if self.arguments.is_empty() {
            format!("SELECT * FROM {function_name}('{data_file}');")
        } else {
            format!(
                "SELECT * FROM {function_name}('{data_file}', {});",
                self.argument_string()
            )
        }
    }
}

/// Decodes an artifact against `schema`.
#[must_use]
pub fn decode_artifact(buf: &[u8], schema: &ParameterSchema) -> DecodedArtifact {
    let Some((&count, _)) = buf.split_first() else {
        return DecodedArtifact::default();
    };

    let mut arguments = Vec::with_capacity(usize::from(count));
    let mut cursor = 1usize;
    let mut truncated = false;

    for _ in 0..count {
        let Some(&[raw_ordinal, declared]) = buf.get(cursor..cursor + 2) else {
            truncated = true;
            break;
        };
        cursor += 2;

        let declared = usize::from(declared);
        let end = cursor.saturating_add(declared);
        let available = &buf[cursor.min(buf.len())..end.min(buf.len())];
        if available.len() < declared {
            truncated = true;
        }

        let param = schema.resolve_wire(raw_ordinal);
        arguments.push(DecodedArgument {
            name: param.name.to_string(),
            kind: param.kind,
            value: decode_value(param.kind, declared, available),
        });
        cursor = end;
    }

    let cursor = cursor.min(buf.len());
    DecodedArtifact {
        arguments,
        payload: buf[cursor..].to_vec(),
        cursor,
        truncated,
    }
}

/// `available` is the prefix of the declared value actually present.
fn decode_value(kind: ParamKind, declared: usize, available: &[u8]) -> String {
    let complete = declared >= NUMERIC_WIDTH && available.len() == declared;
    match kind {
        ParamKind::Boolean => match available.first() {
            Some(byte) if byte % 2 == 0 => "false".to_string(),
            _ => "true".to_string(),
        },
        ParamKind::Integer => match numeric_word(available) {
            Some(word) if complete => i64::from_le_bytes(word).to_string(),
            _ => INTEGER_SENTINEL.to_string(),
        },
        ParamKind::Double => match numeric_word(available) {
            Some(word) if complete => render_double(f64::from_le_bytes(word)),
            _ => format!("{DOUBLE_SENTINEL:?}"),
        },
        ParamKind::Varchar => available.utf8_chunks().map(|c| c.valid()).collect(),
    }
}

/// Non-finite values are quoted so the replay statement still parses.
fn render_double(value: f64) -> String {
    if value.is_finite() {
        format!("{value:?}")
    } else {
        format!("'{}'", value.to_string().to_lowercase())
    }
}

fn numeric_word(bytes: &[u8]) -> Option<[u8; NUMERIC_WIDTH]> {
    bytes.get(..NUMERIC_WIDTH)?.try_into().ok()
}
