//! repasse-reconcile - Cross-check a report against its own summaries.
//!
//! Sums the detailed lines of every polo and compares them with the polo's
//! "RESUMO" grid and printed totals. Exits 1 when any difference exceeds the
//! tolerance.
//!
//! # Usage
//!
//! ```bash
//! repasse-reconcile repasse_fevereiro.html
//! repasse-reconcile repasse_fevereiro.html --tolerance 0.05 --format json
//! ```

use crate::cmd::completions::ShellType;
use crate::cmd::{init_tracing, load_config, read_report, source_name};
use crate::report::{self, JsonIssues};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use repasse_importer::{extract_report, reconcile};
use rust_decimal::Decimal;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Output format for issues.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// JSON output for tooling integration
    Json,
}

/// Cross-check a revenue-sharing report against its summaries.
#[derive(Parser, Debug)]
#[command(name = "repasse-reconcile")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The report file to check
    #[arg(value_name = "FILE", required_unless_present = "generate_completions")]
    pub file: Option<PathBuf>,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", hide = true)]
    pub generate_completions: Option<ShellType>,

    /// Importer configuration (JSON)
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Largest tolerated difference (overrides the configuration)
    #[arg(short, long, value_name = "AMOUNT")]
    pub tolerance: Option<Decimal>,

    /// Output format (text or json)
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Show every parse event
    #[arg(short, long)]
    pub verbose: bool,

    /// Print nothing, report through the exit code only
    #[arg(short, long)]
    pub quiet: bool,
}

/// Main entry point for the reconcile command.
pub fn main() -> ExitCode {
    main_with_name("repasse-reconcile")
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
    if let Some(tolerance) = args.tolerance {
        config.tolerance = tolerance;
    }
    config.validate()?;

    let markup = read_report(file)?;
    let data = extract_report(&markup, &config, &mut |_: &str| {});
    let issues = reconcile(&data, config.tolerance);

    if !args.quiet {
        let mut stdout = io::stdout().lock();
        match args.format {
            OutputFormat::Text => {
                report::write_issues_text(&issues, &mut stdout)?;
                writeln!(
                    stdout,
                    "{}: {} polo(s) checked, {} issue(s)",
                    file.display(),
                    data.polos.len(),
                    issues.len()
                )?;
            }
            OutputFormat::Json => {
                let name = source_name(file);
                report::write_issues_json(
                    &JsonIssues {
                        file: &name,
                        polos: data.polos.len(),
                        issues: &issues,
                    },
                    &mut stdout,
                )?;
            }
        }
        stdout.flush()?;
    }

    if issues.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}
