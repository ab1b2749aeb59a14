//! Import framework for repasse
//!
//! This crate turns revenue-sharing ("repasse") reports, semi-structured HTML
//! generated by an external billing system, into canonical
//! [`FinancialRecord`]s.
//!
//! # Overview
//!
//! Parsing is a single synchronous pass over an in-memory document:
//!
//! 1. [`document`] loads the markup and exposes the top-level rows.
//! 2. [`metadata`] reads the details block.
//! 3. [`scanner`] walks the rows, opening a polo block on each header row and
//!    handing each category section to [`nested`].
//! 4. [`summary`] extracts the "RESUMO" grid of every closed polo.
//! 5. [`transform`] produces the canonical records.
//!
//! Malformed content never fails: problems are reported through the log sink
//! and, when no record at all was produced, through [`ImportResult::errors`].
//!
//! # Example
//!
//! ```rust
//! use repasse_importer::{import_report, ImporterConfig};
//!
//! let config = ImporterConfig::repasse().import_kind("repasse").build();
//! let mut log = |message: &str| eprintln!("{message}");
//! let result = import_report("<html></html>", "fev.html", &config, &mut log);
//! assert!(result.records.is_empty());
//! assert_eq!(result.errors.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod document;
pub mod importer;
pub mod layout;
pub mod log;
pub mod markers;
pub mod metadata;
pub mod nested;
pub mod reconcile;
pub mod registry;
pub mod scanner;
pub mod sink;
pub mod summary;
pub mod transform;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use repasse_core::{parse_reference_period_at, ExtractedData, FinancialRecord, ReferencePeriod};
use std::path::Path;

pub use config::{ConfigError, ImporterConfig, ReportLayout};
pub use document::ReportDocument;
pub use importer::RepasseImporter;
pub use log::ParseLog;
pub use reconcile::{reconcile, ReconciliationIssue};
pub use registry::ImporterRegistry;
pub use sink::{ImportLog, ImportSink, JsonFileSink, MemorySink, SinkError, StoredBatch};
pub use transform::TransformContext;

/// Result of an import operation.
#[derive(Debug, Clone)]
pub struct ImportResult {
    /// Batch id shared by every record.
    pub import_id: String,
    /// Source file name.
    pub source_file: String,
    /// Import kind tag.
    pub import_kind: String,
    /// Reference period of the report.
    pub period: ReferencePeriod,
    /// When the import ran.
    pub imported_at: DateTime<Utc>,
    /// The canonical records.
    pub records: Vec<FinancialRecord>,
    /// Soft failures. Non-empty only when no record was produced.
    pub errors: Vec<String>,
    /// Advisory reconciliation findings.
    pub issues: Vec<ReconciliationIssue>,
}

impl ImportResult {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record was produced.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Add an error to the result.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.errors.push(error.into());
        self
    }

    /// The import log row for this result.
    pub fn import_log(&self) -> ImportLog {
        ImportLog::from_result(self)
    }
}

/// Trait for file importers.
///
/// Implementors extract financial records from one kind of report file.
pub trait Importer: Send + Sync {
    /// Returns the name of this importer.
    fn name(&self) -> &str;

    /// Check if this importer can handle the given file.
    ///
    /// This method should be fast - it typically checks the file extension.
    fn identify(&self, path: &Path) -> bool;

    /// Extract records from the given file.
    fn extract(&self, path: &Path) -> Result<ImportResult>;

    /// Returns a description of what this importer handles.
    fn description(&self) -> &str {
        self.name()
    }
}

/// Parse a report into its extraction-time structure.
pub fn extract_report(
    markup: &str,
    config: &ImporterConfig,
    sink: &mut dyn FnMut(&str),
) -> ExtractedData {
    let mut log = ParseLog::new(sink);
    let doc = ReportDocument::parse(markup);
    let meta = metadata::extract_metadata(&doc, &config.layout.details_selector, &mut log);
    let polos = scanner::scan(&doc, &config.layout, &mut log);
    ExtractedData {
        unit_name: meta.unit_name,
        reference_label: meta.reference_label,
        period_range: meta.period_range,
        polos,
    }
}

/// Import a report, stamping it with the current time.
pub fn import_report(
    markup: &str,
    source_file: &str,
    config: &ImporterConfig,
    sink: &mut dyn FnMut(&str),
) -> ImportResult {
    import_report_at(markup, source_file, config, Local::now(), sink)
}

/// Import a report as of `now`.
///
/// `now` provides the batch id timestamp and the fallback reference period.
pub fn import_report_at(
    markup: &str,
    source_file: &str,
    config: &ImporterConfig,
    now: DateTime<Local>,
    sink: &mut dyn FnMut(&str),
) -> ImportResult {
    let data = extract_report(markup, config, sink);
    let mut log = ParseLog::new(sink);

    let label = Some(data.reference_label.as_str()).filter(|l| !l.trim().is_empty());
    let ctx = TransformContext {
        source_file: source_file.to_string(),
        import_kind: config.import_kind.clone(),
        import_id: transform::import_id(source_file, now.timestamp_millis()),
        period: parse_reference_period_at(label, now.date_naive()),
    };
    let records = transform::transform(&data, &ctx, &mut log);

    let issues = if config.reconcile {
        let issues = reconcile(&data, config.tolerance);
        for issue in &issues {
            log.warn(format!("reconciliation: {issue}"));
        }
        issues
    } else {
        Vec::new()
    };

    let result = ImportResult {
        import_id: ctx.import_id,
        source_file: ctx.source_file,
        import_kind: ctx.import_kind,
        period: ctx.period,
        imported_at: now.with_timezone(&Utc),
        records,
        errors: Vec::new(),
        issues,
    };
    if result.is_empty() {
        log.warn(format!("no records found in {source_file}"));
        return result.with_error(format!("no records found in {source_file}"));
    }
    result
}
