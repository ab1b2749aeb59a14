//! Document loading and tree helpers on top of `scraper`.

use repasse_core::text::collapse_whitespace;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static TR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("valid tr selector"));
static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td, th").expect("valid cell selector"));

/// A parsed report.
pub struct ReportDocument {
    html: Html,
}

impl ReportDocument {
    /// Parse raw markup. Never fails; broken markup is repaired by the parser.
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// First element matching `selector`, if the selector parses.
    pub fn select_first(&self, selector: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(selector).ok()?;
        self.html.select(&selector).next()
    }

    /// Rows of top-level tables, in document order.
    ///
    /// A row is top-level when its nearest enclosing table is not nested in
    /// another table. Rows inside `exclude` (the details block) are skipped.
    pub fn top_level_rows(&self, exclude: Option<ElementRef<'_>>) -> Vec<ElementRef<'_>> {
        let excluded = exclude.map(|e| e.id());
        self.html
            .select(&TR_SELECTOR)
            .filter(|row| {
                let mut tables = row
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .filter(|e| e.value().name() == "table");
                tables.next().is_some() && tables.next().is_none()
            })
            .filter(|row| {
                excluded.map_or(true, |id| {
                    row.id() != id && !row.ancestors().any(|a| a.id() == id)
                })
            })
            .collect()
    }
}

/// Whitespace-normalized text of an element and its descendants.
pub fn collect_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// `td`/`th` children of a row, ignoring cells of nested tables.
pub fn direct_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| matches!(e.value().name(), "td" | "th"))
        .collect()
}

/// Texts of the `td` children of a row. Header cells (`th`) are left out.
pub fn data_cells(row: ElementRef<'_>) -> Vec<String> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "td")
        .map(collect_text)
        .collect()
}

/// All rows below `element`, nested ones included.
pub fn descendant_rows(element: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    element.select(&TR_SELECTOR).collect()
}

/// All cells below `element`.
pub fn descendant_cells(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    element.select(&CELL_SELECTOR)
}

/// Nearest `table` ancestor of an element.
pub fn enclosing_table(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "table")
}
