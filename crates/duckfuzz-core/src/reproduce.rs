//! Crash triage: turns a findings directory into replayable cases.
//!
//! Every artifact is split into its argument stream and data payload. The
//! payload is written as `case_{n}{ext}` and the recovered arguments are
//! collected into `_REPRODUCTIONS.json` next to it, together with the SQL
//! statement that replays the case.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::codec::{decode_artifact, DecodedArtifact};
use crate::error::Result;
use crate::schema::{FileReader, ParameterSchema};

/// Index file written into the output directory.
pub const REPRODUCTIONS_FILE: &str = "_REPRODUCTIONS.json";

/// Fuzzer bookkeeping file in findings directories.
pub const SKIPPED_FILE: &str = "README.txt";

/// One reproduced case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reproduction {
    /// Payload file name inside the output directory.
    pub file_name: String,
    /// Recovered `name=value` argument list.
    pub arguments: String,
    /// Statement replaying the case.
    pub query: String,
}

/// Decodes crash artifacts of one reader function.
#[derive(Debug, Clone)]
pub struct Reproducer {
    schema: ParameterSchema,
    function_name: String,
    extension: String,
}

impl Reproducer {
    /// Reproducer using the built-in schema of `reader`.
    #[must_use]
    pub fn for_reader(reader: FileReader) -> Self {
        Self::new(reader.schema(), reader.function_name(), reader.extension())
    }

    /// Reproducer with an explicit schema.
    #[must_use]
    pub fn new(schema: ParameterSchema, function_name: &str, extension: &str) -> Self {
        Self {
            schema,
            function_name: function_name.to_string(),
            extension: extension.to_string(),
        }
    }

    /// Decodes a single artifact file.
    ///
    /// # Errors
    ///
    /// Fails only if the file cannot be read.
    pub fn decode_file<P: AsRef<Path>>(&self, path: P) -> Result<DecodedArtifact> {
        let bytes = fs::read(path)?;
        Ok(decode_artifact(&bytes, &self.schema))
    }

    /// Reproduces every artifact in `findings_dir` into `output_dir`.
    ///
    /// Artifacts are visited in file name order and numbered by their position
    /// in that order, so case numbers stay stable across runs.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors in either directory.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        findings_dir: P,
        output_dir: Q,
    ) -> Result<Vec<Reproduction>> {
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir)?;

        let mut artifacts: Vec<PathBuf> = fs::read_dir(findings_dir.as_ref())?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        artifacts.retain(|p| p.is_file());
        artifacts.sort();

        let mut reproductions = Vec::with_capacity(artifacts.len());
        for (n, artifact) in artifacts.iter().enumerate() {
            if artifact.file_name().is_some_and(|name| name == SKIPPED_FILE) {
                continue;
            }
            let decoded = self.decode_file(artifact)?;
            let file_name = format!("case_{n}{}", self.extension);
            fs::write(output_dir.join(&file_name), &decoded.payload)?;
            debug!(
                artifact = %artifact.display(),
                case = %file_name,
                truncated = decoded.truncated,
                "Artifact decoded"
            );
            reproductions.push(Reproduction {
                arguments: decoded.argument_string(),
                query: decoded.reproduction_query(&self.function_name, &file_name),
                file_name,
            });
        }

        let index = serde_json::to_string_pretty(&reproductions)?;
        fs::write(output_dir.join(REPRODUCTIONS_FILE), index)?;
        info!(
            cases = reproductions.len(),
            output = %output_dir.display(),
            "Findings reproduced"
        );
        Ok(reproductions)
    }
}
