//! repasse-extract - Import a revenue-sharing report.
//!
//! Reads one report and prints its financial records.
//!
//! # Usage
//!
//! ```bash
//! repasse-extract repasse_fevereiro.html
//! repasse-extract repasse_fevereiro.html --format csv > registros.csv
//! repasse-extract repasse_fevereiro.html --config repasse.json --output batch.json
//! ```

use crate::cmd::completions::ShellType;
use crate::cmd::{init_tracing, load_config};
use crate::report;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use repasse_importer::{ImportSink, ImporterRegistry, JsonFileSink};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Output format for records.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON array of records (default)
    #[default]
    Json,
    /// CSV with a header row
    Csv,
    /// Totals per polo and category
    Summary,
}

/// Import a revenue-sharing report and print its records.
#[derive(Parser, Debug)]
#[command(name = "repasse-extract")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The report file to import
    #[arg(value_name = "FILE", required_unless_present = "generate_completions")]
    pub file: Option<PathBuf>,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", hide = true)]
    pub generate_completions: Option<ShellType>,

    /// Importer configuration (JSON)
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Import kind stored on every record
    #[arg(long, value_name = "KIND")]
    pub import_kind: Option<String>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Also write the batch and its import log to this JSON file
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Show every parse event
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress warnings and the closing message
    #[arg(short, long)]
    pub quiet: bool,
}

/// Main entry point for the extract command.
pub fn main() -> ExitCode {
    main_with_name("repasse-extract")
}

/// Main entry point with custom binary name.
pub fn main_with_name(bin_name: &str) -> ExitCode {
    let args = Args::parse();

    // Handle shell completion generation
    if let Some(shell) = args.generate_completions {
        crate::cmd::completions::generate_completions::<Args>(shell, bin_name);
        return ExitCode::SUCCESS;
    }

    init_tracing(args.verbose, args.quiet);

    match run(&args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let Some(file) = args.file.as_deref() else {
        anyhow::bail!("FILE is required");
    };

    let mut config = load_config(args.config.as_deref())?;
    if let Some(kind) = &args.import_kind {
        config.import_kind.clone_from(kind);
    }
    config.validate()?;

    let registry = ImporterRegistry::with_defaults(config);
    let result = registry.extract(file)?;

    if !args.quiet {
        for issue in &result.issues {
            eprintln!("warning: reconciliation: {issue}");
        }
        for error in &result.errors {
            eprintln!("warning: {error}");
        }
    }

    let mut stdout = io::stdout().lock();
    match args.format {
        OutputFormat::Json => report::write_json(&result.records, &mut stdout)?,
        OutputFormat::Csv => report::write_csv(&result.records, &mut stdout)?,
        OutputFormat::Summary => report::write_summary(&result, &mut stdout)?,
    }
    stdout.flush()?;

    if let Some(output) = &args.output {
        JsonFileSink::new(output)
            .write_batch(&result.import_log(), &result.records)
            .with_context(|| format!("Failed to write batch: {}", output.display()))?;
    }

    if !args.quiet {
        eprintln!(
            "Extracted {} records from {}",
            result.records.len(),
            file.display()
        );
    }

    if result.errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}
