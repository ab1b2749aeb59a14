//! Storage boundary.
//!
//! An import is written as one batch: the records plus a one-row import log.
//! Tenant scoping and transactions belong to the implementor.

use crate::ImportResult;
use chrono::{DateTime, Utc};
use repasse_core::{Decimal, FinancialRecord, ReferencePeriod};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while writing a batch.
#[derive(Debug, Error)]
pub enum SinkError {
    /// IO error on the target file.
    #[error("failed to write {path}: {source}")]
    Io {
        /// The target path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization failed.
    #[error("failed to serialize batch: {0}")]
    Json(#[from] serde_json::Error),

    /// A batch with this import id was already written.
    #[error("import {0} already written")]
    Duplicate(String),
}

/// One row of the import log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportLog {
    /// Batch id shared by the records.
    pub import_id: String,
    /// Source file name.
    #[serde(rename = "arquivo")]
    pub source_file: String,
    /// Import kind tag.
    #[serde(rename = "tipo")]
    pub import_kind: String,
    /// Reference period of the report.
    #[serde(rename = "referencia")]
    pub period: ReferencePeriod,
    /// Number of records written.
    #[serde(rename = "registros")]
    pub record_count: usize,
    /// Sum of paid amounts.
    #[serde(rename = "total_pago")]
    pub paid_total: Decimal,
    /// Sum of forwarded amounts.
    #[serde(rename = "total_repasse")]
    pub forwarded_total: Decimal,
    /// When the import ran.
    #[serde(rename = "data_importacao")]
    pub imported_at: DateTime<Utc>,
}

impl ImportLog {
    /// Summarize an import result.
    pub fn from_result(result: &ImportResult) -> Self {
        let (paid_total, forwarded_total) = result
            .records
            .iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(paid, fwd), r| {
                (paid.saturating_add(r.paid), fwd.saturating_add(r.forwarded))
            });
        Self {
            import_id: result.import_id.clone(),
            source_file: result.source_file.clone(),
            import_kind: result.import_kind.clone(),
            period: result.period,
            record_count: result.records.len(),
            paid_total,
            forwarded_total,
            imported_at: result.imported_at,
        }
    }
}

/// Destination of import batches.
pub trait ImportSink {
    /// Write one batch. Either everything is written or nothing is.
    fn write_batch(&mut self, log: &ImportLog, records: &[FinancialRecord])
        -> Result<(), SinkError>;
}

/// A batch as stored by the bundled sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBatch {
    /// The import log row.
    pub log: ImportLog,
    /// The records.
    pub records: Vec<FinancialRecord>,
}

/// Keeps batches in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    batches: Vec<StoredBatch>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Batches written so far.
    pub fn batches(&self) -> &[StoredBatch] {
        &self.batches
    }

    /// All records across batches.
    pub fn records(&self) -> impl Iterator<Item = &FinancialRecord> {
        self.batches.iter().flat_map(|b| b.records.iter())
    }
}

impl ImportSink for MemorySink {
    fn write_batch(
        &mut self,
        log: &ImportLog,
        records: &[FinancialRecord],
    ) -> Result<(), SinkError> {
        if self.batches.iter().any(|b| b.log.import_id == log.import_id) {
            return Err(SinkError::Duplicate(log.import_id.clone()));
        }
        self.batches.push(StoredBatch {
            log: log.clone(),
            records: records.to_vec(),
        });
        Ok(())
    }
}

/// Writes each batch as a pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// Sink writing to `path`, replacing any previous content.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back a batch written by this sink.
    pub fn read(path: &Path) -> Result<StoredBatch, SinkError> {
        let file = File::open(path).map_err(|source| SinkError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
}

impl ImportSink for JsonFileSink {
    fn write_batch(
        &mut self,
        log: &ImportLog,
        records: &[FinancialRecord],
    ) -> Result<(), SinkError> {
        let batch = StoredBatch {
            log: log.clone(),
            records: records.to_vec(),
        };
        // Serialize first so a failure leaves the target untouched.
        let body = serde_json::to_vec_pretty(&batch)?;
        let io_err = |source| SinkError::Io {
            path: self.path.clone(),
            source,
        };
        let file = File::create(&self.path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        std::io::Write::write_all(&mut writer, &body).map_err(io_err)?;
        std::io::Write::flush(&mut writer).map_err(io_err)?;
        tracing::debug!(path = %self.path.display(), records = records.len(), "batch written");
        Ok(())
    }
}
