//! duckfuzz CLI
//!
//! Builds prepended fuzz corpora, triages crash artifacts and repairs the
//! database containers a mutating fuzzer produces.
//! Pedantic lints relaxed for CLI ergonomics.

// CLI tool - relax pedantic lints for ergonomics
#![allow(clippy::pedantic)]

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::prelude::*;

use duckfuzz_core::corpus::load_scenarios;
use duckfuzz_core::schema::artifact::SchemaArtifact;
use duckfuzz_core::schema::declaration::{load_declarations, render_declarations};
use duckfuzz_core::{
    repair_paged_file, repair_wal_file, CorpusBuilder, DuckfuzzConfig, FileReader, PagedRepair,
    ParameterSchema, Reproducer, WalRepair,
};

#[derive(Parser)]
#[command(name = "duckfuzz")]
#[command(version)]
#[command(about = "Fuzz corpus, crash triage and container repair tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (default: ./duckfuzz.toml)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Reader function plus an optional schema file overriding its built-in table.
#[derive(clap::Args)]
struct TargetArgs {
    /// Reader function (read_csv, read_json, read_parquet)
    #[arg(short, long, default_value = "read_csv")]
    target: FileReader,

    /// Schema file (.toml artifact or native declaration text)
    #[arg(short, long, value_name = "FILE")]
    schema: Option<PathBuf>,
}

impl TargetArgs {
    fn resolve(&self) -> anyhow::Result<ParameterSchema> {
        let Some(path) = &self.schema else {
            return Ok(self.target.schema());
        };
        let schema = if path.extension().is_some_and(|ext| ext == "toml") {
            SchemaArtifact::load(path)?.into_schema()?
        } else {
            load_declarations(path)?
        };
        info!("Loaded {} parameters from {:?}", schema.len(), path);
        Ok(schema)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaFormat {
    /// Machine-readable TOML artifact
    Toml,
    /// Native declaration table
    Native,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a prepended corpus from a scenario list
    Corpus {
        /// Scenario JSON file
        scenarios: PathBuf,

        /// Directory data file paths are resolved against
        #[arg(short, long, default_value = ".")]
        data_root: PathBuf,

        /// Output directory (recreated)
        #[arg(short, long, default_value = "corpus_prepended")]
        output: PathBuf,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Decode one crash artifact
    Decode {
        /// Artifact file
        artifact: PathBuf,

        /// Write the data payload to this file
        #[arg(long, value_name = "FILE")]
        payload_out: Option<PathBuf>,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Reproduce every artifact in a findings directory
    Reproduce {
        /// Findings directory
        findings: PathBuf,

        /// Output directory for case files and the index
        #[arg(short, long, default_value = "reproductions")]
        output: PathBuf,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Repair a write-ahead log in place
    RepairWal {
        /// WAL file
        file: PathBuf,
    },

    /// Repair a paged database file in place
    RepairDb {
        /// Database file
        file: PathBuf,
    },

    /// Print a target's schema
    Schema {
        /// Output format
        #[arg(short, long, value_enum, default_value = "toml")]
        format: SchemaFormat,

        #[command(flatten)]
        target: TargetArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DuckfuzzConfig::load_from_path(path),
        None => DuckfuzzConfig::load(),
    }
    .context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    init_logging(&config, cli.verbose);

    match cli.command {
        Commands::Corpus {
            scenarios,
            data_root,
            output,
            target,
        } => build_corpus(&config, &scenarios, &data_root, &output, &target)?,
        Commands::Decode {
            artifact,
            payload_out,
            target,
        } => decode(&artifact, payload_out.as_deref(), &target)?,
        Commands::Reproduce {
            findings,
            output,
            target,
        } => reproduce(&findings, &output, &target)?,
        Commands::RepairWal { file } => {
            let report = repair_wal_file(&file, &WalRepair::from_config(&config.repair))?;
            println!("Repaired {:?}", file);
            println!("   Entries:          {}", report.entries);
            println!("   Header fixed:     {}", report.header_fixed);
            println!("   Sizes rewritten:  {}", report.sizes_rewritten);
            println!("   Entries padded:   {}", report.entries_padded);
            println!("   Bytes padded:     {}", report.bytes_padded);
            println!("   Checksums fixed:  {}", report.checksums_fixed);
        }
        Commands::RepairDb { file } => {
            let report = repair_paged_file(&file, &PagedRepair::from_config(&config.repair))?;
            println!("Repaired {:?}", file);
            println!("   File size:        {}", report.file_size);
            println!("   Bytes padded:     {}", report.bytes_padded);
            println!("   Header fixed:     {}", report.header_fields_fixed);
            println!("   Header checksums: {}", report.header_checksums_fixed);
            println!("   Blocks:           {}", report.blocks);
            println!("   Block checksums:  {}", report.block_checksums_fixed);
        }
        Commands::Schema { format, target } => {
            let schema = target.resolve()?;
            let text = match format {
                SchemaFormat::Toml => {
                    SchemaArtifact::from_schema(Some(target.target), &schema).to_toml()?
                }
                SchemaFormat::Native => render_declarations(&schema),
            };
            print!("{text}");
        }
    }

    Ok(())
}

fn init_logging(config: &DuckfuzzConfig, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("duckfuzz_core={level},duckfuzz={level}"))
    });

    // stdout carries command output only
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn build_corpus(
    config: &DuckfuzzConfig,
    scenarios: &Path,
    data_root: &Path,
    output: &Path,
    target: &TargetArgs,
) -> anyhow::Result<()> {
    info!("Loading scenarios from {:?}", scenarios);

    let scenarios = load_scenarios(scenarios)?;
    let report = CorpusBuilder::new(target.resolve()?, data_root)
        .with_config(&config.corpus)
        .build(&scenarios, output)?;

    println!("Corpus written to {:?}", output);
    println!("   Considered:          {}", report.considered);
    println!("   Created:             {}", report.created);
    println!("   File not found:      {}", report.file_not_found);
    println!("   Content too long:    {}", report.content_too_long);
    println!("   Value too long:      {}", report.value_too_long);
    println!("   Schema mismatch:     {}", report.schema_mismatch);
    println!("   Invalid boolean:     {}", report.invalid_boolean);
    println!("   Too many arguments:  {}", report.too_many_arguments);

    Ok(())
}

fn decode(artifact: &Path, payload_out: Option<&Path>, target: &TargetArgs) -> anyhow::Result<()> {
    let reproducer = Reproducer::new(
        target.resolve()?,
        target.target.function_name(),
        target.target.extension(),
    );
    let decoded = reproducer.decode_file(artifact)?;

    let data_file = payload_out.map_or_else(
        || format!("data{}", target.target.extension()),
        |p| p.display().to_string(),
    );
    println!("arguments: {}", decoded.argument_string());
    println!(
        "query:     {}",
        decoded.reproduction_query(target.target.function_name(), &data_file)
    );
    println!("payload:   {} bytes", decoded.payload.len());
    if decoded.truncated {
        println!("note:      argument stream was truncated");
    }

    if let Some(path) = payload_out {
        fs::write(path, &decoded.payload)
            .with_context(|| format!("failed to write payload to {}", path.display()))?;
    }

    Ok(())
}

fn reproduce(findings: &Path, output: &Path, target: &TargetArgs) -> anyhow::Result<()> {
    info!("Reproducing artifacts from {:?}", findings);

    let reproducer = Reproducer::new(
        target.resolve()?,
        target.target.function_name(),
        target.target.extension(),
    );
    let cases = reproducer.run(findings, output)?;

    for case in &cases {
        println!("{}", case.query);
    }
    println!("Reproduced {} artifacts into {:?}", cases.len(), output);

    Ok(())
}
