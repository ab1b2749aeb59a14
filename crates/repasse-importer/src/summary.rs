//! Summary grid extraction.
//!
//! The rows buffered for a polo are re-wrapped into a standalone table and
//! searched for the "RESUMO" cell. Its table holds one row per billing type,
//! with a paid/forwarded pair of cells per category slot after the label.

use crate::document::{
    collect_text, descendant_cells, descendant_rows, direct_cells, enclosing_table,
};
use crate::markers::SUMMARY_ANCHOR;
use repasse_core::text::fold_upper;
use repasse_core::{SummaryCell, SummaryGrid};
use scraper::Html;

/// Which grid row a summary label fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GridRow {
    MonthlyFee,
    Service,
    Agreement,
    Total,
}

impl GridRow {
    fn from_label(label: &str) -> Option<Self> {
        match fold_upper(label).as_str() {
            "MENSALIDADE" => Some(Self::MonthlyFee),
            "SERVICO" => Some(Self::Service),
            "ACORDO" => Some(Self::Agreement),
            "TOTAL" => Some(Self::Total),
            _ => None,
        }
    }

    fn slot_of(self, grid: &mut SummaryGrid) -> &mut [SummaryCell; 5] {
        match self {
            Self::MonthlyFee => &mut grid.monthly_fee,
            Self::Service => &mut grid.service,
            Self::Agreement => &mut grid.agreement,
            Self::Total => &mut grid.total,
        }
    }
}

/// Paid/forwarded pairs of a summary row, one per category slot.
///
/// Pair `i` sits at columns `2i + 1` and `2i + 2`; missing cells read as
/// `"0.00"`.
pub fn row_cells(cells: &[String]) -> [SummaryCell; 5] {
    std::array::from_fn(|i| {
        let value = |index: usize| {
            cells
                .get(index)
                .cloned()
                .unwrap_or_else(|| SummaryCell::ZERO.to_string())
        };
        SummaryCell::new(value(2 * i + 1), value(2 * i + 2))
    })
}

/// Extract the summary grid from a polo's buffered row markup.
///
/// Returns `None` when no "RESUMO" anchor exists.
pub fn extract_summary(raw_rows: &[String]) -> Option<SummaryGrid> {
    let fragment = Html::parse_fragment(&format!("<table>{}</table>", raw_rows.concat()));
    let root = fragment.root_element();

    let anchor = descendant_cells(root)
        .find(|cell| collect_text(*cell).eq_ignore_ascii_case(SUMMARY_ANCHOR))?;
    let table = enclosing_table(anchor)?;

    let mut grid = SummaryGrid::default();
    for row in descendant_rows(table) {
        let cells: Vec<String> = direct_cells(row).into_iter().map(collect_text).collect();
        let Some(kind) = cells.first().and_then(|label| GridRow::from_label(label)) else {
            continue;
        };
        *kind.slot_of(&mut grid) = row_cells(&cells);
    }

    Some(grid)
}
