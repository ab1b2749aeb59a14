//! Column layouts of the nested data tables.
//!
//! Fields are located by position only. Each layout is a small table from
//! field to column index, so a change in the report generator is a one-line
//! edit here.

use regex::Regex;
use repasse_core::text::collapse_whitespace;
use std::sync::LazyLock;

/// A named column of a nested data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Sequence number.
    Sequence,
    /// Student enrollment id.
    StudentId,
    /// Student document (CPF).
    DocumentId,
    /// Student name.
    StudentName,
    /// Course, possibly `Name (CODE)`.
    Course,
    /// Polo declared on the line.
    StudentPolo,
    /// Combined "polo / turma" column of the other-revenue layout.
    PoloComposite,
    /// Launch type.
    LaunchType,
    /// Discount description.
    Description,
    /// Installment.
    Installment,
    /// Due date.
    DueDate,
    /// Payment date.
    PaymentDate,
    /// Gross amount.
    Gross,
    /// Net amount.
    Net,
}

/// Positional mapping of one nested table kind.
#[derive(Debug)]
pub struct ColumnLayout {
    /// Layout name, used in log messages.
    pub name: &'static str,
    /// Rows with fewer cells are skipped.
    pub min_columns: usize,
    columns: &'static [(Field, usize)],
}

impl ColumnLayout {
    /// Whether a row has enough cells for this layout.
    pub fn accepts(&self, cells: &[String]) -> bool {
        cells.len() >= self.min_columns
    }

    /// Cell text of `field`, empty when the layout has no such column.
    pub fn get<'c>(&self, cells: &'c [String], field: Field) -> &'c str {
        self.columns
            .iter()
            .find(|(f, _)| *f == field)
            .and_then(|&(_, index)| cells.get(index))
            .map_or("", String::as_str)
    }
}

/// Revenue categories other than "Universo EAD".
pub static GENERIC_REVENUE: ColumnLayout = ColumnLayout {
    name: "generic revenue",
    min_columns: 13,
    columns: &[
        (Field::Sequence, 0),
        (Field::StudentId, 1),
        (Field::DocumentId, 2),
        (Field::StudentName, 3),
        (Field::Course, 4),
        (Field::StudentPolo, 5),
        (Field::LaunchType, 6),
        (Field::Installment, 7),
        (Field::DueDate, 8),
        (Field::PaymentDate, 9),
        (Field::Gross, 10),
        (Field::Net, 12),
    ],
};

/// "Universo EAD" revenue: an order column shifts the student fields right
/// and the polo lives in a composite column.
pub static OTHER_REVENUE: ColumnLayout = ColumnLayout {
    name: "other revenue",
    min_columns: 14,
    columns: &[
        (Field::Sequence, 0),
        (Field::StudentId, 2),
        (Field::DocumentId, 3),
        (Field::StudentName, 4),
        (Field::Course, 5),
        (Field::PoloComposite, 6),
        (Field::LaunchType, 7),
        (Field::Installment, 8),
        (Field::DueDate, 9),
        (Field::PaymentDate, 10),
        (Field::Gross, 11),
        (Field::Net, 13),
    ],
};

/// Discount lines.
pub static DISCOUNT: ColumnLayout = ColumnLayout {
    name: "discount",
    min_columns: 13,
    columns: &[
        (Field::Sequence, 0),
        (Field::Description, 6),
        (Field::Installment, 7),
        (Field::DueDate, 8),
        (Field::PaymentDate, 9),
        (Field::Gross, 10),
        (Field::Net, 12),
    ],
};

static COURSE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]*)\)").expect("valid course code regex"));

/// Split `Course Name (CODE)` into `(name, code)`.
///
/// Without a bracketed code both halves are the full text.
pub fn split_course(course: &str) -> (String, String) {
    match COURSE_CODE_RE.captures(course) {
        Some(caps) => {
            let code = caps[1].trim().to_string();
            let name = collapse_whitespace(&COURSE_CODE_RE.replace(course, " "));
            (name, code)
        }
        None => (course.to_string(), course.to_string()),
    }
}

/// Polo part of a composite `polo / turma` cell.
pub fn composite_polo(composite: &str) -> String {
    composite
        .split('/')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}
