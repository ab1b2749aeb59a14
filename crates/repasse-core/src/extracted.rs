//! Extraction-time entities.
//!
//! These types hold a report exactly as it was read: every value is still the
//! raw cell text. They live only for the duration of one import and are turned
//! into [`FinancialRecord`](crate::FinancialRecord)s by the importer.

use crate::record::Category;
use serde::{Deserialize, Serialize};

/// Category slots of the summary grid, in column order.
pub const SUMMARY_SLOTS: [Category; 5] = [
    Category::Graduacao,
    Category::PosGraduacao,
    Category::Tecnico,
    Category::Profissionalizante,
    Category::UniversoEad,
];

/// One billing line of a revenue section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// Sequence number within the section.
    pub sequence: String,
    /// Student enrollment identifier.
    pub student_id: String,
    /// Student document (CPF) identifier.
    pub document_id: String,
    /// Student name.
    pub student_name: String,
    /// Course name, without the bracketed code.
    pub course_name: String,
    /// Course code (the full course text when no code was bracketed).
    pub course_code: String,
    /// Polo declared on the student's line.
    pub student_polo: String,
    /// Launch type as written in the report.
    pub launch_type: String,
    /// Installment as written in the report.
    pub installment: String,
    /// Due date as written in the report.
    pub due_date: String,
    /// Payment date as written in the report.
    pub payment_date: String,
    /// Gross (paid) amount, raw.
    pub gross: String,
    /// Net (forwarded) amount, raw.
    pub net: String,
}

/// One line of a discount section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDiscount {
    /// Description of the discount.
    pub description: String,
    /// Installment as written in the report.
    pub installment: String,
    /// Due date as written in the report.
    pub due_date: String,
    /// Payment date as written in the report.
    pub payment_date: String,
    /// Gross amount, raw.
    pub gross: String,
    /// Net amount, raw.
    pub net: String,
    /// Always [`ExtractedDiscount::LAUNCH_TYPE`].
    pub launch_type: String,
}

impl ExtractedDiscount {
    /// Launch-type tag carried by every discount line.
    pub const LAUNCH_TYPE: &'static str = "Desconto";
}

/// A paid/forwarded pair of the summary grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCell {
    /// Paid amount, raw.
    pub paid: String,
    /// Forwarded amount, raw.
    pub forwarded: String,
}

impl SummaryCell {
    /// Raw value used for cells missing from the source table.
    pub const ZERO: &'static str = "0.00";

    /// Create a cell from raw strings.
    pub fn new(paid: impl Into<String>, forwarded: impl Into<String>) -> Self {
        Self {
            paid: paid.into(),
            forwarded: forwarded.into(),
        }
    }
}

impl Default for SummaryCell {
    fn default() -> Self {
        Self::new(Self::ZERO, Self::ZERO)
    }
}

/// The "RESUMO" reconciliation grid of one polo.
///
/// Each row always has one cell per entry of [`SUMMARY_SLOTS`], whatever the
/// source table looked like.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryGrid {
    /// Monthly-fee row.
    pub monthly_fee: [SummaryCell; 5],
    /// Service row.
    pub service: [SummaryCell; 5],
    /// Agreement row.
    pub agreement: [SummaryCell; 5],
    /// Total row.
    pub total: [SummaryCell; 5],
}

/// One polo block of the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPoloData {
    /// Legal (company) name of the polo.
    pub legal_name: String,
    /// Display name with boilerplate removed.
    pub name: String,
    /// Banking information as printed.
    pub banking_info: String,
    /// Undergraduate revenue lines.
    pub graduacao: Vec<ExtractedRecord>,
    /// Graduate revenue lines.
    pub pos_graduacao: Vec<ExtractedRecord>,
    /// Technical-course revenue lines.
    pub tecnico: Vec<ExtractedRecord>,
    /// Professionalizing-course revenue lines.
    pub profissionalizante: Vec<ExtractedRecord>,
    /// "Universo EAD" revenue lines.
    pub universo_ead: Vec<ExtractedRecord>,
    /// Discount lines.
    pub discounts: Vec<ExtractedDiscount>,
    /// Gross invoice total, raw.
    pub gross_total: Option<String>,
    /// Discount total, raw.
    pub discount_total: Option<String>,
    /// Net (forwarded) total, raw.
    pub net_total: Option<String>,
    /// Summary grid, attached when the block is closed.
    pub summary: Option<SummaryGrid>,
}

impl ExtractedPoloData {
    /// Create an empty block for a polo.
    pub fn new(
        legal_name: impl Into<String>,
        name: impl Into<String>,
        banking_info: impl Into<String>,
    ) -> Self {
        Self {
            legal_name: legal_name.into(),
            name: name.into(),
            banking_info: banking_info.into(),
            ..Self::default()
        }
    }

    /// The revenue collection for a category, `None` for discounts.
    pub fn revenue_mut(&mut self, category: Category) -> Option<&mut Vec<ExtractedRecord>> {
        match category {
            Category::Graduacao => Some(&mut self.graduacao),
            Category::PosGraduacao => Some(&mut self.pos_graduacao),
            Category::Tecnico => Some(&mut self.tecnico),
            Category::Profissionalizante => Some(&mut self.profissionalizante),
            Category::UniversoEad => Some(&mut self.universo_ead),
            Category::Desconto => None,
        }
    }

    /// All revenue collections paired with their category, in slot order.
    pub fn revenue(&self) -> [(Category, &[ExtractedRecord]); 5] {
        [
            (Category::Graduacao, self.graduacao.as_slice()),
            (Category::PosGraduacao, self.pos_graduacao.as_slice()),
            (Category::Tecnico, self.tecnico.as_slice()),
            (Category::Profissionalizante, self.profissionalizante.as_slice()),
            (Category::UniversoEad, self.universo_ead.as_slice()),
        ]
    }

    /// Number of revenue and discount lines in this block.
    pub fn line_count(&self) -> usize {
        self.revenue()
            .iter()
            .map(|(_, records)| records.len())
            .sum::<usize>()
            + self.discounts.len()
    }
}

/// A whole report as read from the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedData {
    /// Name of the issuing unit.
    pub unit_name: String,
    /// Reference-period label, e.g. `REPASSE FEVEREIRO/2023`.
    pub reference_label: String,
    /// Period range label, e.g. `01/02/2023 a 28/02/2023`.
    pub period_range: String,
    /// Polo blocks in document order.
    pub polos: Vec<ExtractedPoloData>,
}
