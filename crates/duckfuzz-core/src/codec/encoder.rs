//! Scenario argument encoder.

use std::collections::BTreeMap;

use super::{DOUBLE_SENTINEL, INTEGER_SENTINEL, MAX_PREFIX_VALUE};
use crate::error::{Error, Result};
use crate::schema::{ParamKind, ParameterSchema};

/// Encodes `arguments` against `schema` into an argument stream.
///
/// Arguments are written in name order. Every value is length-checked before
/// anything is encoded, so a rejected scenario produces no partial stream.
///
/// # Errors
///
/// - [`Error::TooManyArguments`] for more than 255 arguments
/// - [`Error::ValueTooLong`] for a value of 256 bytes or more
/// - [`Error::SchemaMismatch`] for a name the schema does not declare
/// - [`Error::InvalidBooleanLiteral`] for boolean text with no true/false marker
pub fn encode_arguments(
    arguments: &BTreeMap<String, String>,
    schema: &ParameterSchema,
) -> Result<Vec<u8>> {
    if arguments.len() > MAX_PREFIX_VALUE {
        return Err(Error::TooManyArguments(arguments.len()));
    }
    if let Some((name, value)) = arguments.iter().find(|(_, v)| v.len() > MAX_PREFIX_VALUE) {
        return Err(Error::ValueTooLong {
            name: name.clone(),
            len: value.len(),
        });
    }

    let mut out = Vec::with_capacity(1 + arguments.values().map(|v| v.len() + 10).sum::<usize>());
    out.push(arguments.len() as u8);
    for (name, value) in arguments {
        let (ordinal, kind) = schema.lookup(name)?;
        let bytes = encode_value(name, value, kind)?;
        out.push(ordinal);
        out.push(bytes.len() as u8);
        out.extend_from_slice(&bytes);
    }
    Ok(out)
}

fn encode_value(name: &str, value: &str, kind: ParamKind) -> Result<Vec<u8>> {
    match kind {
        ParamKind::Boolean => Ok(vec![encode_boolean(name, value)?]),
        ParamKind::Integer => {
            let parsed = value.trim().parse::<i64>().unwrap_or_else(|_| {
                tracing::warn!(
                    parameter = name,
                    value,
                    sentinel = INTEGER_SENTINEL,
                    "Unparseable INTEGER, substituting sentinel"
                );
                INTEGER_SENTINEL
            });
            Ok(parsed.to_le_bytes().to_vec())
        }
        ParamKind::Double => {
            let parsed = value.trim().parse::<f64>().unwrap_or_else(|_| {
                tracing::warn!(
                    parameter = name,
                    value,
                    sentinel = DOUBLE_SENTINEL,
                    "Unparseable DOUBLE, substituting sentinel"
                );
                DOUBLE_SENTINEL
            });
            Ok(parsed.to_le_bytes().to_vec())
        }
        ParamKind::Varchar => Ok(value.as_bytes().to_vec()),
    }
}

/// True markers win over false markers: `"1"` and any casing of `"true"`
/// encode `'1'`, then `"0"` and `"false"` encode `'0'`.
fn encode_boolean(name: &str, value: &str) -> Result<u8> {
    let lowered = value.to_lowercase();
    if lowered.contains("true") || lowered.contains('1') {
        Ok(b'1')
    } else if lowered.contains("false") || lowered.contains('0') {
        Ok(b'0')
    } else {
        Err(Error::InvalidBooleanLiteral {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}
