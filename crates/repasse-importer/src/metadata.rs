//! Report metadata from the details block.

use crate::document::{collect_text, descendant_rows, direct_cells, ReportDocument};
use crate::log::ParseLog;
use repasse_core::text::fold_upper;

/// Header fields of a report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportMetadata {
    /// Issuing unit.
    pub unit_name: String,
    /// Reference-period label.
    pub reference_label: String,
    /// Period range label.
    pub period_range: String,
}

impl ReportMetadata {
    fn assign(&mut self, label: &str, value: &str) {
        let label = fold_upper(label);
        let value = value.trim().to_string();
        if label.contains("UNIDADE") {
            self.unit_name = value;
        } else if label.contains("REFERENCIA") {
            self.reference_label = value;
        } else if label.contains("PERIODO") {
            self.period_range = value;
        }
    }
}

/// Read the details block. A missing block yields empty metadata and a warning.
pub fn extract_metadata(
    doc: &ReportDocument,
    details_selector: &str,
    log: &mut ParseLog<'_>,
) -> ReportMetadata {
    let mut meta = ReportMetadata::default();
    let Some(details) = doc.select_first(details_selector) else {
        log.warn(format!("details block ({details_selector}) not found"));
        return meta;
    };

    for row in descendant_rows(details) {
        let cells: Vec<String> = direct_cells(row).into_iter().map(collect_text).collect();
        match cells.as_slice() {
            [label, value, ..] => meta.assign(label, value),
            [single] => {
                if let Some((label, value)) = single.split_once(':') {
                    meta.assign(label, value);
                }
            }
            [] => {}
        }
    }

    log.event(format!(
        "details: unit={:?} reference={:?} period={:?}",
        meta.unit_name, meta.reference_label, meta.period_range
    ));
    meta
}
