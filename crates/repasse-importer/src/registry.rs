//! Registry for importers.

use crate::{ImportResult, Importer, ImporterConfig, RepasseImporter};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

/// Registry of importers.
///
/// The registry holds a collection of importers and picks the first one that
/// identifies a given file.
pub struct ImporterRegistry {
    importers: Vec<Arc<dyn Importer>>,
}

impl ImporterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            importers: Vec::new(),
        }
    }

    /// A registry holding the report importer with the given configuration.
    pub fn with_defaults(config: ImporterConfig) -> Self {
        let mut registry = Self::new();
        registry.register(RepasseImporter::new(config));
        registry
    }

    /// Register a new importer.
    pub fn register(&mut self, importer: impl Importer + 'static) {
        self.importers.push(Arc::new(importer));
    }

    /// Find an importer that can handle the given file.
    pub fn identify(&self, path: &Path) -> Option<Arc<dyn Importer>> {
        self.importers
            .iter()
            .find(|importer| importer.identify(path))
            .map(Arc::clone)
    }

    /// Extract records from a file using the appropriate importer.
    pub fn extract(&self, path: &Path) -> Result<ImportResult> {
        let importer = self
            .identify(path)
            .with_context(|| format!("No importer found for file: {}", path.display()))?;

        importer
            .extract(path)
            .with_context(|| format!("Failed to extract from: {}", path.display()))
    }

    /// List all registered importers.
    pub fn list_importers(&self) -> Vec<(&str, &str)> {
        self.importers
            .iter()
            .map(|i| (i.name(), i.description()))
            .collect()
    }

    /// Get the number of registered importers.
    pub fn len(&self) -> usize {
        self.importers.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.importers.is_empty()
    }
}

impl Default for ImporterRegistry {
    fn default() -> Self {
        Self::with_defaults(ImporterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use repasse_core::ReferencePeriod;

    struct MockImporter {
        name: &'static str,
        extension: &'static str,
    }

    impl Importer for MockImporter {
        fn name(&self) -> &str {
            self.name
        }

        fn identify(&self, path: &Path) -> bool {
            path.extension().is_some_and(|ext| ext == self.extension)
        }

        fn extract(&self, path: &Path) -> Result<ImportResult> {
            Ok(ImportResult {
                import_id: format!("{}_0", path.display()),
                source_file: path.display().to_string(),
                import_kind: self.name.to_string(),
                period: ReferencePeriod { month: 1, year: 2024 },
                imported_at: Utc::now(),
                records: Vec::new(),
                errors: Vec::new(),
                issues: Vec::new(),
            })
        }

        fn description(&self) -> &'static str {
            "Mock importer for testing"
        }
    }

    #[test]
    fn test_registry_basic() {
        let mut registry = ImporterRegistry::new();
        assert!(registry.is_empty());

        registry.register(MockImporter {
            name: "polo",
            extension: "txt",
        });
        registry.register(MockImporter {
            name: "ead",
            extension: "dat",
        });

        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
        assert_eq!(
            registry.list_importers(),
            vec![
                ("polo", "Mock importer for testing"),
                ("ead", "Mock importer for testing")
            ]
        );
    }

    #[test]
    fn test_registry_identify() {
        let mut registry = ImporterRegistry::new();
        registry.register(MockImporter {
            name: "polo",
            extension: "txt",
        });

        assert_eq!(registry.identify(Path::new("a.txt")).unwrap().name(), "polo");
        assert!(registry.identify(Path::new("a.pdf")).is_none());
    }

    #[test]
    fn test_default_registry_handles_reports() {
        let registry = ImporterRegistry::default();
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.identify(Path::new("repasse.html")).unwrap().name(),
            "repasse"
        );
        assert!(registry.identify(Path::new("extrato.ofx")).is_none());
    }

    #[test]
    fn test_extract_without_importer() {
        let registry = ImporterRegistry::new();
        let err = registry.extract(Path::new("a.pdf")).unwrap_err();
        assert!(err.to_string().contains("No importer found"));
    }

    #[test]
    fn test_extract_dispatches() {
        let mut registry = ImporterRegistry::new();
        registry.register(MockImporter {
            name: "polo",
            extension: "txt",
        });
        let result = registry.extract(Path::new("a.txt")).unwrap();
        assert_eq!(result.import_kind, "polo");
    }
}
