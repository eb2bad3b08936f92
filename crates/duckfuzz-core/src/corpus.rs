//! Corpus builder.
//!
//! Turns scraped scenarios into fuzz corpus files: each file is the encoded
//! argument stream of one scenario followed by the bytes of its data file.
//!
//! Scenarios that cannot be encoded, or whose data file is missing or too
//! large to fuzz well, are counted per reason in a [`CorpusReport`] and
//! skipped. Only output I/O aborts a build.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::codec::encode_arguments;
use crate::config::CorpusConfig;
use crate::error::{Error, Result};
use crate::schema::ParameterSchema;

/// One scraped reader invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario number, used for the corpus file name.
    pub id: u32,
    /// Data file, relative to the data root unless absolute.
    pub data_file: PathBuf,
    /// Argument name to value text.
    #[serde(default)]
    pub arguments: BTreeMap<String, String>,
}

impl Scenario {
    /// Arguments with lowercased names.
    ///
    /// Reader parameter names are case-insensitive in SQL but stored lowercase
    /// in every schema. Names differing only in case collapse into one entry;
    /// [`CorpusBuilder::prepare`] rejects such scenarios.
    #[must_use]
    pub fn normalized_arguments(&self) -> BTreeMap<String, String> {
        self.arguments
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.clone()))
            .collect()
    }
}

/// Reads a JSON list of scenarios.
///
/// # Errors
///
/// Fails on I/O errors or malformed JSON.
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<Scenario>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Why a scenario did not make it into the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Data file does not exist.
    FileNotFound,
    /// Data file exceeds the configured size limit.
    ContentTooLong,
    /// An argument value is 256 bytes or longer.
    ValueTooLong,
    /// An argument name is not in the schema, or two names differ only in case.
    SchemaMismatch,
    /// A boolean argument has no true/false marker.
    InvalidBoolean,
    /// 256 or more arguments.
    TooManyArguments,
}

impl RejectReason {
    fn from_error(err: &Error) -> Option<Self> {
        match err {
            Error::SchemaMismatch(_) => Some(Self::SchemaMismatch),
            Error::ValueTooLong { .. } => Some(Self::ValueTooLong),
            Error::InvalidBooleanLiteral { .. } => Some(Self::InvalidBoolean),
            Error::TooManyArguments(_) => Some(Self::TooManyArguments),
            _ => None,
        }
    }
}

/// Result of preparing one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioOutcome {
    /// Corpus file content: argument stream followed by the data file.
    Encoded(Vec<u8>),
    /// The scenario was skipped.
    Rejected(RejectReason),
}

/// Outcome counts of one corpus build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorpusReport {
    /// Scenarios read.
    pub considered: usize,
    /// Corpus files written.
    pub created: usize,
    /// Rejected: data file missing.
    pub file_not_found: usize,
    /// Rejected: data file too large.
    pub content_too_long: usize,
    /// Rejected: argument value too long.
    pub value_too_long: usize,
    /// Rejected: unknown argument name.
    pub schema_mismatch: usize,
    /// Rejected: unparseable boolean.
    pub invalid_boolean: usize,
    /// Rejected: too many arguments.
    pub too_many_arguments: usize,
}

impl CorpusReport {
    /// Total rejected scenarios.
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.file_not_found
            + self.content_too_long
            + self.value_too_long
            + self.schema_mismatch
            + self.invalid_boolean
            + self.too_many_arguments
    }

    fn record(&mut self, reason: RejectReason) {
        let counter = match reason {
            RejectReason::FileNotFound => &mut self.file_not_found,
            RejectReason::ContentTooLong => &mut self.content_too_long,
            RejectReason::ValueTooLong => &mut self.value_too_long,
            RejectReason::SchemaMismatch => &mut self.schema_mismatch,
            RejectReason::InvalidBoolean => &mut self.invalid_boolean,
            RejectReason::TooManyArguments => &mut self.too_many_arguments,
        };
        *counter += 1;
    }
}

/// Builds a prepended corpus for one reader schema.
#[derive(Debug, Clone)]
pub struct CorpusBuilder {
    schema: ParameterSchema,
    data_root: PathBuf,
    max_data_file_size: u64,
}

impl CorpusBuilder {
    /// Creates a builder resolving data files against `data_root`.
    #[must_use]
    pub fn new(schema: ParameterSchema, data_root: impl Into<PathBuf>) -> Self {
        Self {
            schema,
            data_root: data_root.into(),
            max_data_file_size: CorpusConfig::default().max_data_file_size,
        }
    }

    /// Applies the `[corpus]` configuration section.
    #[must_use]
    pub fn with_config(mut self, config: &CorpusConfig) -> Self {
        self.max_data_file_size = config.max_data_file_size;
        self
    }

    /// Corpus file name of a scenario.
    #[must_use]
    pub fn file_name(scenario: &Scenario) -> String {
        format!("{:04}_prepended", scenario.id)
    }

    /// Encodes one scenario into corpus file content.
    ///
    /// # Errors
    ///
    /// Unusable scenarios are a [`ScenarioOutcome::Rejected`], not an error.
    /// Returns [`Error::Io`] if the data file exists but cannot be read.
    pub fn prepare(&self, scenario: &Scenario) -> Result<ScenarioOutcome> {
        let arguments = scenario.normalized_arguments();
        if arguments.len() != scenario.arguments.len() {
            warn!(
                id = scenario.id,
                "Argument names collide after lowercasing, scenario rejected"
            );
            return Ok(ScenarioOutcome::Rejected(RejectReason::SchemaMismatch));
        }

        let mut content = match encode_arguments(&arguments, &self.schema) {
            Ok(stream) => stream,
            Err(err) => match RejectReason::from_error(&err) {
                Some(reason) => {
                    debug!(id = scenario.id, error = %err, "Scenario rejected");
                    return Ok(ScenarioOutcome::Rejected(reason));
                }
                None => return Err(err),
            },
        };

        let data_file = self.data_root.join(&scenario.data_file);
        if !data_file.is_file() {
            debug!(id = scenario.id, path = %data_file.display(), "Data file not found");
            return Ok(ScenarioOutcome::Rejected(RejectReason::FileNotFound));
        }
        let data = fs::read(&data_file)?;
        if data.len() as u64 > self.max_data_file_size {
            debug!(id = scenario.id, len = data.len(), "Data file too large");
            return Ok(ScenarioOutcome::Rejected(RejectReason::ContentTooLong));
        }

        content.extend_from_slice(&data);
        Ok(ScenarioOutcome::Encoded(content))
    }

    /// Writes the corpus for `scenarios` into `output_dir`.
    ///
    /// The output directory is deleted and recreated first.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors in the output directory or on unreadable data files.
    pub fn build<P: AsRef<Path>>(
        &self,
        scenarios: &[Scenario],
        output_dir: P,
    ) -> Result<CorpusReport> {
        let output_dir = output_dir.as_ref();
        if output_dir.exists() {
            fs::remove_dir_all(output_dir)?;
        }
        fs::create_dir_all(output_dir)?;

        let mut report = CorpusReport {
            considered: scenarios.len(),
            ..CorpusReport::default()
        };
        for scenario in scenarios {
            match self.prepare(scenario)? {
                ScenarioOutcome::Encoded(content) => {
                    fs::write(output_dir.join(Self::file_name(scenario)), content)?;
                    report.created += 1;
                }
                ScenarioOutcome::Rejected(reason) => report.record(reason),
            }
        }

        if report.rejected() > 0 {
            warn!(rejected = report.rejected(), "Some scenarios were rejected");
        }
        info!(
            considered = report.considered,
            created = report.created,
            file_not_found = report.file_not_found,
            content_too_long = report.content_too_long,
            value_too_long = report.value_too_long,
            schema_mismatch = report.schema_mismatch,
            "Corpus built"
        );
        Ok(report)
    }
}
