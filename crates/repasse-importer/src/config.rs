//! Configuration for the report importer.

use rust_decimal::Decimal;
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading a configuration file.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid JSON for this schema.
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The details-block selector does not parse as CSS.
    #[error("invalid details selector {selector:?}: {message}")]
    InvalidSelector {
        /// The offending selector.
        selector: String,
        /// Parser message.
        message: String,
    },

    /// A negative reconciliation tolerance.
    #[error("tolerance must not be negative, got {0}")]
    NegativeTolerance(Decimal),
}

/// Structural markers of the report markup.
///
/// The report has no schema; sections are recognized by how they look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLayout {
    /// Background colors (lower-case hex) that mark a polo header cell.
    pub polo_header_backgrounds: Vec<String>,
    /// Minimum `colspan` of a section title cell.
    pub section_title_min_colspan: u32,
    /// CSS selector of the details block.
    pub details_selector: String,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self {
            polo_header_backgrounds: vec!["#d9e1f2".to_string(), "#dce6f1".to_string()],
            section_title_min_colspan: 5,
            details_selector: "#detalhes, table.detalhes".to_string(),
        }
    }
}

/// Configuration for an importer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImporterConfig {
    /// Import kind stored on every record.
    pub import_kind: String,
    /// Markup markers.
    pub layout: ReportLayout,
    /// Whether to cross-check detailed lines against the summary grid.
    pub reconcile: bool,
    /// Largest difference tolerated by the reconciliation check.
    pub tolerance: Decimal,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            import_kind: "repasse".to_string(),
            layout: ReportLayout::default(),
            reconcile: true,
            tolerance: Decimal::new(1, 2),
        }
    }
}

impl ImporterConfig {
    /// Start building a report importer configuration.
    pub fn repasse() -> RepasseConfigBuilder {
        RepasseConfigBuilder::new()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Check the values serde cannot check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Err(e) = Selector::parse(&self.layout.details_selector) {
            return Err(ConfigError::InvalidSelector {
                selector: self.layout.details_selector.clone(),
                message: e.to_string(),
            });
        }
        if self.tolerance.is_sign_negative() {
            return Err(ConfigError::NegativeTolerance(self.tolerance));
        }
        Ok(())
    }
}

/// Builder for report importer configuration.
pub struct RepasseConfigBuilder {
    config: ImporterConfig,
}

impl RepasseConfigBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ImporterConfig::default(),
        }
    }

    /// Set the import kind stored on records.
    pub fn import_kind(mut self, kind: impl Into<String>) -> Self {
        self.config.import_kind = kind.into();
        self
    }

    /// Add a background color marking polo header cells.
    pub fn polo_header_background(mut self, color: impl Into<String>) -> Self {
        self.config
            .layout
            .polo_header_backgrounds
            .push(color.into().to_lowercase());
        self
    }

    /// Set the minimum colspan of section title cells.
    pub const fn section_title_min_colspan(mut self, colspan: u32) -> Self {
        self.config.layout.section_title_min_colspan = colspan;
        self
    }

    /// Set the CSS selector of the details block.
    pub fn details_selector(mut self, selector: impl Into<String>) -> Self {
        self.config.layout.details_selector = selector.into();
        self
    }

    /// Enable or disable the reconciliation check.
    pub const fn reconcile(mut self, reconcile: bool) -> Self {
        self.config.reconcile = reconcile;
        self
    }

    /// Set the reconciliation tolerance.
    pub const fn tolerance(mut self, tolerance: Decimal) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Build the importer configuration.
    pub fn build(self) -> ImporterConfig {
        self.config
    }
}

impl Default for RepasseConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
