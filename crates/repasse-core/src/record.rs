//! Canonical financial records.
//!
//! A [`FinancialRecord`] is the storage-ready form of one billing line of a
//! revenue-sharing report. Serialized field names follow the storage schema.

use crate::period::ReferencePeriod;
use crate::text::fold_upper;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Revenue classification of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Undergraduate revenue.
    #[serde(rename = "Receita Graduação")]
    Graduacao,
    /// Graduate revenue.
    #[serde(rename = "Receita Pós-Graduação")]
    PosGraduacao,
    /// Technical-course revenue.
    #[serde(rename = "Receita Técnico")]
    Tecnico,
    /// Professionalizing-course revenue.
    #[serde(rename = "Receita Profissionalizante")]
    Profissionalizante,
    /// "Universo EAD" revenue, the report's "other revenue" block.
    #[serde(rename = "Receita Universo EAD")]
    UniversoEad,
    /// Discounts granted to students.
    #[serde(rename = "Desconto")]
    Desconto,
}

impl Category {
    /// All categories, in report order.
    pub const ALL: [Self; 6] = [
        Self::Graduacao,
        Self::PosGraduacao,
        Self::Tecnico,
        Self::Profissionalizante,
        Self::UniversoEad,
        Self::Desconto,
    ];

    /// Human-readable label, identical to the serialized form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Graduacao => "Receita Graduação",
            Self::PosGraduacao => "Receita Pós-Graduação",
            Self::Tecnico => "Receita Técnico",
            Self::Profissionalizante => "Receita Profissionalizante",
            Self::UniversoEad => "Receita Universo EAD",
            Self::Desconto => "Desconto",
        }
    }

    /// Whether this is a revenue category (anything but discounts).
    #[must_use]
    pub const fn is_revenue(self) -> bool {
        !matches!(self, Self::Desconto)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Billing-line subtype ("launch type").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordType {
    /// Regular monthly fee.
    #[serde(rename = "Mensalidade")]
    Mensalidade,
    /// Debt renegotiation agreement installment.
    #[serde(rename = "Acordo")]
    Acordo,
    /// One-off service charge.
    #[serde(rename = "Serviço")]
    Servico,
    /// Discount line.
    #[serde(rename = "Desconto")]
    Desconto,
}

impl RecordType {
    /// Human-readable label, identical to the serialized form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mensalidade => "Mensalidade",
            Self::Acordo => "Acordo",
            Self::Servico => "Serviço",
            Self::Desconto => "Desconto",
        }
    }

    /// Classify a launch-type cell.
    ///
    /// Matching is accent- and case-insensitive and keyword based, so
    /// `"SERVICO AVULSO"` and `"Serviço"` both classify as [`RecordType::Servico`].
    /// Returns `None` for empty or unrecognized text.
    #[must_use]
    pub fn classify(launch_type: &str) -> Option<Self> {
        let folded = fold_upper(launch_type);
        if folded.is_empty() {
            None
        } else if folded.contains("ACORDO") {
            Some(Self::Acordo)
        } else if folded.contains("SERVICO") {
            Some(Self::Servico)
        } else if folded.contains("DESCONTO") {
            Some(Self::Desconto)
        } else if folded.contains("MENSALIDADE") {
            Some(Self::Mensalidade)
        } else {
            None
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A normalized financial transaction produced by one import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialRecord {
    /// Location the record is attributed to.
    pub polo: String,
    /// Revenue category.
    #[serde(rename = "categoria")]
    pub category: Category,
    /// Billing-line subtype.
    #[serde(rename = "tipo")]
    pub kind: RecordType,
    /// Installment number, zero when unknown.
    #[serde(rename = "parcela")]
    pub installment: u32,
    /// Amount paid by the student (gross).
    #[serde(rename = "valor_pago")]
    pub paid: Decimal,
    /// Amount forwarded to the polo (net).
    #[serde(rename = "valor_repasse")]
    pub forwarded: Decimal,
    /// Reference month, `1..=12`.
    #[serde(rename = "referencia_mes")]
    pub reference_month: u32,
    /// Reference year.
    #[serde(rename = "referencia_ano")]
    pub reference_year: i32,
    /// Import batch identifier shared by all records of one import.
    pub import_id: String,
    /// Name of the file the record was read from.
    #[serde(rename = "arquivo_origem")]
    pub source_file: String,
    /// Kind of import that produced the record.
    #[serde(rename = "tipo_importacao")]
    pub import_kind: String,
    /// Course code, when the report carried one.
    #[serde(rename = "codigo_curso", skip_serializing_if = "Option::is_none", default)]
    pub course_code: Option<String>,
}

impl FinancialRecord {
    /// The reference period of this record.
    #[must_use]
    pub const fn period(&self) -> ReferencePeriod {
        ReferencePeriod {
            month: self.reference_month,
            year: self.reference_year,
        }
    }

    /// Compare two records ignoring the import batch identifier.
    ///
    /// Batch ids embed a timestamp, so two imports of the same document only
    /// differ there.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.polo == other.polo
            && self.category == other.category
            && self.kind == other.kind
            && self.installment == other.installment
            && self.paid == other.paid
            && self.forwarded == other.forwarded
            && self.reference_month == other.reference_month
            && self.reference_year == other.reference_year
            && self.source_file == other.source_file
            && self.import_kind == other.import_kind
            && self.course_code == other.course_code
    }
}
