//! Command implementations for CLI tools.
//!
//! Each module contains the full implementation for a command,
//! which can be invoked by thin wrapper binaries.

pub mod completions;
pub mod extract_cmd;
pub mod reconcile_cmd;

use anyhow::{Context, Result};
use repasse_importer::ImporterConfig;
use std::path::Path;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Install the log subscriber.
///
/// `--verbose` shows every parse event; otherwise `RUST_LOG` decides and
/// defaults to warnings.
pub fn init_tracing(verbose: bool, quiet: bool) {
    if verbose {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .init();
    } else if !quiet {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .without_time()
            .with_target(false)
            .init();
    }
}

/// Load the importer configuration, from `path` when given.
pub fn load_config(path: Option<&Path>) -> Result<ImporterConfig> {
    match path {
        Some(path) => ImporterConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(ImporterConfig::default()),
    }
}

/// Read a report file. Bytes that are not UTF-8 are replaced.
pub fn read_report(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("file not found: {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// File name of a path, for use as the record source.
pub fn source_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
