//! Declaration-text schema source.
//!
//! The native fuzz targets declare their parameter table as a list of
//! `std::make_tuple("name", "TYPE")` entries. This module extracts those
//! tuples in declaration order from arbitrary surrounding text and renders a
//! schema back into the same form.

use pest::Parser as PestParser;
use std::fmt::Write as _;
use std::path::Path;

use super::{ParamKind, ParameterSchema};
use crate::error::{Error, Result};

mod grammar {
    use pest_derive::Parser;

    #[derive(Parser)]
    #[grammar = "schema/declaration.pest"]
    pub(super) struct DeclarationParser;
}

use grammar::{DeclarationParser, Rule};

/// Extracts `(name, kind)` tuples in declaration order.
///
/// # Errors
///
/// Returns [`Error::InvalidSchema`] if a declared type is not one of the four
/// wire kinds.
pub fn parse_declarations(text: &str) -> Result<Vec<(String, ParamKind)>> {
    let pairs = DeclarationParser::parse(Rule::declarations, text)
        .map_err(|e| Error::InvalidSchema(e.to_string()))?;

    let mut declarations = Vec::new();
    for tuple in pairs.flatten().filter(|p| p.as_rule() == Rule::tuple) {
        let mut fields = tuple
            .into_inner()
            .filter_map(|string| string.into_inner().next())
            .map(|inner| inner.as_str());
        let (Some(name), Some(kind)) = (fields.next(), fields.next()) else {
            continue;
        };
        declarations.push((name.to_string(), kind.parse::<ParamKind>()?));
    }
    Ok(declarations)
}

/// Builds a schema from declaration text.
///
/// # Errors
///
/// Fails on unknown types, duplicate names, or text without declarations.
pub fn schema_from_declarations(text: &str) -> Result<ParameterSchema> {
    ParameterSchema::new(parse_declarations(text)?)
}

/// Reads declaration text from a file.
///
/// # Errors
///
/// Fails on I/O errors or an invalid table.
pub fn load_declarations<P: AsRef<Path>>(path: P) -> Result<ParameterSchema> {
    let text = std::fs::read_to_string(path)?;
    schema_from_declarations(&text)
}

/// Renders the schema as the native parameter table.
#[must_use]
pub fn render_declarations(schema: &ParameterSchema) -> String {
    let mut out = String::from(
        "#include <string>\n#include <tuple>\n#include <vector>\n\n\
         extern const std::vector<std::tuple<std::string, std::string>> g_all_parameters = {\n",
    );
    let last = schema.len().saturating_sub(1);
    for param in schema.iter() {
        let sep = if usize::from(param.ordinal) == last { "" } else { "," };
        let _ = writeln!(
            out,
            "    std::make_tuple(\"{}\", \"{}\"){sep}",
            param.name, param.kind
        );
    }
    out.push_str("};\n");
    out
}
