//! File importer for revenue-sharing reports.

use crate::{import_report, ImportResult, Importer, ImporterConfig};
use anyhow::{Context, Result};
use std::path::Path;

/// Extensions the report generator is known to produce. The `.xls` files are
/// HTML with a spreadsheet extension.
const EXTENSIONS: &[&str] = &["html", "htm", "xls"];

/// Importer for "repasse" HTML reports.
#[derive(Debug, Clone, Default)]
pub struct RepasseImporter {
    config: ImporterConfig,
}

impl RepasseImporter {
    /// Create an importer with the given configuration.
    pub const fn new(config: ImporterConfig) -> Self {
        Self { config }
    }

    /// The importer configuration.
    pub const fn config(&self) -> &ImporterConfig {
        &self.config
    }

    /// Import report contents. Parse events go to `tracing` only.
    pub fn extract_from_string(&self, content: &str, source_file: &str) -> ImportResult {
        import_report(content, source_file, &self.config, &mut |_: &str| {})
    }
}

impl Importer for RepasseImporter {
    fn name(&self) -> &'static str {
        "repasse"
    }

    fn identify(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
    }

    fn extract(&self, path: &Path) -> Result<ImportResult> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read report: {}", path.display()))?;
        // The generator does not always emit UTF-8; stray bytes are replaced.
        let content = String::from_utf8_lossy(&bytes);
        let source_file = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        let result = self.extract_from_string(&content, &source_file);
        tracing::info!(
            file = %source_file,
            records = result.records.len(),
            issues = result.issues.len(),
            "report imported"
        );
        Ok(result)
    }

    fn description(&self) -> &'static str {
        "Revenue-sharing (repasse) HTML reports"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_identify() {
        let importer = RepasseImporter::default();
        assert!(importer.identify(Path::new("repasse_fev.html")));
        assert!(importer.identify(Path::new("REPASSE.HTM")));
        assert!(importer.identify(Path::new("relatorio.xls")));
        assert!(!importer.identify(Path::new("extrato.csv")));
        assert!(!importer.identify(Path::new("sem_extensao")));
    }

    #[test]
    fn test_extract_missing_file() {
        let importer = RepasseImporter::default();
        let err = importer
            .extract(Path::new("/nonexistent/repasse.html"))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read report"));
    }

    #[test]
    fn test_extract_uses_file_name() {
        let mut file = tempfile::Builder::new().suffix(".html").tempfile().unwrap();
        file.write_all(b"<html><body>\xff</body></html>").unwrap();

        let importer = RepasseImporter::new(ImporterConfig::repasse().import_kind("teste").build());
        let result = importer.extract(file.path()).unwrap();
        let name = file.path().file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(result.source_file, name);
        assert!(result.import_id.starts_with(&name));
        assert_eq!(result.import_kind, "teste");
        assert_eq!(result.errors.len(), 1);
    }
}
