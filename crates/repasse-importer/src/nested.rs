//! Nested record extraction.
//!
//! Turns the cell texts of a category's nested table into extraction records.
//! Rows too short for their layout are padding and are skipped silently.

use crate::layout::{
    composite_polo, split_course, ColumnLayout, Field, DISCOUNT, GENERIC_REVENUE, OTHER_REVENUE,
};
use repasse_core::{Category, ExtractedDiscount, ExtractedRecord};

/// Layout used for a category's nested table.
pub fn layout_for(category: Category) -> &'static ColumnLayout {
    match category {
        Category::Desconto => &DISCOUNT,
        Category::UniversoEad => &OTHER_REVENUE,
        _ => &GENERIC_REVENUE,
    }
}

/// Revenue record from a generic-layout row.
pub fn generic_record(cells: &[String]) -> Option<ExtractedRecord> {
    let layout = &GENERIC_REVENUE;
    if !layout.accepts(cells) {
        return None;
    }
    let (course_name, course_code) = split_course(layout.get(cells, Field::Course));
    Some(ExtractedRecord {
        course_name,
        course_code,
        student_polo: layout.get(cells, Field::StudentPolo).to_string(),
        ..common_fields(layout, cells)
    })
}

/// Revenue record from an "Universo EAD" row.
///
/// The course cell is taken whole, and the polo comes from the composite
/// "polo / turma" column.
pub fn other_revenue_record(cells: &[String]) -> Option<ExtractedRecord> {
    let layout = &OTHER_REVENUE;
    if !layout.accepts(cells) {
        return None;
    }
    let course = layout.get(cells, Field::Course).to_string();
    Some(ExtractedRecord {
        course_name: course.clone(),
        course_code: course,
        student_polo: composite_polo(layout.get(cells, Field::PoloComposite)),
        ..common_fields(layout, cells)
    })
}

/// Discount line from a discount-layout row.
pub fn discount_record(cells: &[String]) -> Option<ExtractedDiscount> {
    let layout = &DISCOUNT;
    if !layout.accepts(cells) {
        return None;
    }
    let get = |field| layout.get(cells, field).to_string();
    Some(ExtractedDiscount {
        description: get(Field::Description),
        installment: get(Field::Installment),
        due_date: get(Field::DueDate),
        payment_date: get(Field::PaymentDate),
        gross: get(Field::Gross),
        net: get(Field::Net),
        launch_type: ExtractedDiscount::LAUNCH_TYPE.to_string(),
    })
}

/// Fields read the same way in every revenue layout.
fn common_fields(layout: &ColumnLayout, cells: &[String]) -> ExtractedRecord {
    let get = |field| layout.get(cells, field).to_string();
    ExtractedRecord {
        sequence: get(Field::Sequence),
        student_id: get(Field::StudentId),
        document_id: get(Field::DocumentId),
        student_name: get(Field::StudentName),
        launch_type: get(Field::LaunchType),
        installment: get(Field::Installment),
        due_date: get(Field::DueDate),
        payment_date: get(Field::PaymentDate),
        gross: get(Field::Gross),
        net: get(Field::Net),
        ..ExtractedRecord::default()
    }
}

/// Records of one nested table.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SectionRows {
    /// Revenue records (empty for discount sections).
    pub records: Vec<ExtractedRecord>,
    /// Discount lines (empty for revenue sections).
    pub discounts: Vec<ExtractedDiscount>,
    /// Rows that did not fit the layout.
    pub skipped: usize,
}

/// Extract every row of a category's nested table.
pub fn extract_section(category: Category, rows: &[Vec<String>]) -> SectionRows {
    let mut out = SectionRows::default();
    for cells in rows {
        if category == Category::Desconto {
            match discount_record(cells) {
                Some(discount) => out.discounts.push(discount),
                None => out.skipped += 1,
            }
            continue;
        }
        let record = if category == Category::UniversoEad {
            other_revenue_record(cells)
        } else {
            generic_record(cells)
        };
        match record {
            Some(record) => out.records.push(record),
            None => out.skipped += 1,
        }
    }
    out
}
