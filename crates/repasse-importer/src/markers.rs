//! Structural predicates over report rows and cells.
//!
//! The report has no semantic markup. Polo headers are recognized by a
//! background color on their first cell, section titles by a wide bold cell,
//! totals by a bold label. Each heuristic lives in its own function.

use crate::config::ReportLayout;
use crate::document::{collect_text, direct_cells};
use repasse_core::text::fold_upper;
use repasse_core::Category;
use scraper::ElementRef;

/// Text of the title cell that introduces the summary grid.
pub const SUMMARY_ANCHOR: &str = "RESUMO";

/// Which aggregate total a totals row carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalKind {
    /// Gross invoiced total.
    Gross,
    /// Discount total.
    Discount,
    /// Net (forwarded) total.
    Net,
}

/// Style attribute lower-cased with whitespace removed.
fn compact_style(element: ElementRef<'_>) -> String {
    element
        .value()
        .attr("style")
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether a cell carries one of the configured background colors.
pub fn has_background(cell: ElementRef<'_>, colors: &[String]) -> bool {
    let style = compact_style(cell);
    let bgcolor = cell
        .value()
        .attr("bgcolor")
        .map(|c| c.trim().to_lowercase());

    colors.iter().any(|color| {
        let color = color.to_lowercase();
        style.contains(&format!("background-color:{color}"))
            || style.contains(&format!("background:{color}"))
            || bgcolor.as_deref() == Some(color.as_str())
    })
}

/// Whether a cell is rendered bold.
///
/// Bold markup inside a nested table belongs to that table, not the cell.
pub fn is_bold(cell: ElementRef<'_>) -> bool {
    let style = compact_style(cell);
    if style.contains("font-weight:bold") || style.contains("font-weight:700") {
        return true;
    }
    cell.descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| matches!(e.value().name(), "b" | "strong"))
        .any(|e| {
            !e.ancestors()
                .take_while(|a| a.id() != cell.id())
                .filter_map(ElementRef::wrap)
                .any(|a| a.value().name() == "table")
        })
}

/// `colspan` of a cell, 1 when absent or unreadable.
pub fn colspan(cell: ElementRef<'_>) -> u32 {
    cell.value()
        .attr("colspan")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(1)
}

/// Whether a row opens a new polo block.
pub fn is_polo_header(row: ElementRef<'_>, layout: &ReportLayout) -> bool {
    direct_cells(row)
        .first()
        .is_some_and(|cell| has_background(*cell, &layout.polo_header_backgrounds))
}

/// Title text when a row is a section title.
///
/// A section title is a wide bold cell. The summary anchor looks the same
/// but is not a section.
pub fn section_title(row: ElementRef<'_>, layout: &ReportLayout) -> Option<String> {
    direct_cells(row)
        .into_iter()
        .find(|cell| colspan(*cell) >= layout.section_title_min_colspan && is_bold(*cell))
        .map(collect_text)
        .filter(|text| !text.is_empty() && !text.eq_ignore_ascii_case(SUMMARY_ANCHOR))
}

/// Classify a section title.
///
/// Graduate is checked before undergraduate since `PÓS-GRADUAÇÃO` contains
/// `GRADUAÇÃO`.
pub fn classify_section(title: &str) -> Option<Category> {
    let folded = fold_upper(title);
    if folded.contains("DESCONTO") {
        Some(Category::Desconto)
    } else if folded.contains("POS-GRADUACAO")
        || folded.contains("POS GRADUACAO")
        || folded.contains("POSGRADUACAO")
    {
        Some(Category::PosGraduacao)
    } else if folded.contains("GRADUACAO") {
        Some(Category::Graduacao)
    } else if folded.contains("TECNICO") {
        Some(Category::Tecnico)
    } else if folded.contains("PROFISSIONALIZANTE") {
        Some(Category::Profissionalizante)
    } else if folded.contains("UNIVERSO") {
        Some(Category::UniversoEad)
    } else {
        None
    }
}

/// Classify a totals label.
pub fn classify_total(label: &str) -> Option<TotalKind> {
    let folded = fold_upper(label);
    if folded.contains("DESCONTO") {
        Some(TotalKind::Discount)
    } else if folded.contains("LIQUIDO") || folded.contains("REPASSE") {
        Some(TotalKind::Net)
    } else if folded.contains("BRUTO") || folded.contains("FATURA") {
        Some(TotalKind::Gross)
    } else {
        None
    }
}

/// Kind and value when a row carries an aggregate total.
///
/// The label is a bold cell mentioning `TOTAL` or `VALOR`; the value is the
/// next cell of the row. Labels matching no total kind are not totals rows.
pub fn totals_entry(row: ElementRef<'_>) -> Option<(TotalKind, String)> {
    let cells = direct_cells(row);
    cells.iter().enumerate().find_map(|(i, cell)| {
        if !is_bold(*cell) {
            return None;
        }
        let label = collect_text(*cell);
        let folded = fold_upper(&label);
        if !(folded.contains("TOTAL") || folded.contains("VALOR")) {
            return None;
        }
        let kind = classify_total(&label)?;
        let value = cells.get(i + 1).map(|c| collect_text(*c)).unwrap_or_default();
        Some((kind, value))
    })
}
