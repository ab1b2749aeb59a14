//! Section scanner.
//!
//! Walks the top-level rows once. The scan state is either "no polo open" or
//! "inside a polo", the latter carrying the polo being filled, its active
//! category and the raw markup of rows kept for the summary extractor.
//! Each transition consumes the state and returns the next one.

use crate::config::ReportLayout;
use crate::document::{collect_text, data_cells, descendant_rows, direct_cells, ReportDocument};
use crate::log::ParseLog;
use crate::markers::{classify_section, is_polo_header, section_title, totals_entry, TotalKind};
use crate::nested::{extract_section, layout_for};
use crate::summary::extract_summary;
use repasse_core::text::collapse_whitespace;
use repasse_core::{Category, ExtractedPoloData, SummaryGrid};
use scraper::ElementRef;

/// Boilerplate in front of polo display names, longest first.
const POLO_PREFIXES: &[&str] = &["POLO DE APOIO PRESENCIAL", "POLO"];
/// Boilerplate after polo display names.
const POLO_SUFFIXES: &[&str] = &["- EAD", "(EAD)"];

/// What a top-level row is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    /// Opens a polo block.
    PoloHeader {
        /// Legal name (cell 0).
        legal_name: String,
        /// Cleaned display name (cell 1).
        name: String,
        /// Banking info (cell 2).
        banking_info: String,
    },
    /// Introduces a category section; carries the title text.
    SectionTitle(String),
    /// An aggregate total.
    Totals(TotalKind, String),
    /// Anything else.
    Other,
}

/// Classify a top-level row. Rules are tried in order.
pub fn classify_row(row: ElementRef<'_>, layout: &ReportLayout) -> RowKind {
    if is_polo_header(row, layout) {
        let cells: Vec<String> = direct_cells(row).into_iter().map(collect_text).collect();
        let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
        return RowKind::PoloHeader {
            legal_name: cell(0),
            name: clean_polo_name(&cell(1)),
            banking_info: cell(2),
        };
    }
    if let Some(title) = section_title(row, layout) {
        return RowKind::SectionTitle(title);
    }
    match totals_entry(row) {
        Some((kind, value)) => RowKind::Totals(kind, value),
        None => RowKind::Other,
    }
}

/// Strip known boilerplate from a polo display name.
///
/// `"POLO DE APOIO PRESENCIAL - Campinas (EAD)"` becomes `"Campinas"`. A name
/// that would end up empty is returned whitespace-normalized instead.
pub fn clean_polo_name(raw: &str) -> String {
    let collapsed = collapse_whitespace(raw);
    let mut name = collapsed.as_str();

    for prefix in POLO_PREFIXES {
        let Some(head) = name.get(..prefix.len()) else {
            continue;
        };
        let rest = &name[prefix.len()..];
        if head.eq_ignore_ascii_case(prefix)
            && rest.chars().next().is_some_and(|c| !c.is_alphanumeric())
        {
            name = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ':' || c == '-');
            break;
        }
    }

    for suffix in POLO_SUFFIXES {
        let Some(cut) = name.len().checked_sub(suffix.len()) else {
            continue;
        };
        if name
            .get(cut..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
        {
            name = name[..cut].trim_end();
        }
    }

    if name.is_empty() {
        collapsed
    } else {
        name.to_string()
    }
}

/// A polo being filled.
#[derive(Debug)]
struct OpenPolo {
    data: ExtractedPoloData,
    category: Option<Category>,
    raw_rows: Vec<String>,
}

/// Scanner state.
#[derive(Debug)]
enum ScanState {
    NoPolo,
    InPolo(Box<OpenPolo>),
}

impl ScanState {
    /// Close the open polo, if any, and open a new one.
    fn open_polo(
        self,
        data: ExtractedPoloData,
        closed: &mut Vec<ExtractedPoloData>,
        log: &mut ParseLog<'_>,
    ) -> Self {
        closed.extend(self.close(log));
        log.event(format!("polo opened: {}", data.name));
        Self::InPolo(Box::new(OpenPolo {
            data,
            category: None,
            raw_rows: Vec::new(),
        }))
    }

    /// Handle a section title and the container row that follows it.
    fn section(
        mut self,
        title: &str,
        container: Option<ElementRef<'_>>,
        log: &mut ParseLog<'_>,
    ) -> Self {
        let Self::InPolo(open) = &mut self else {
            log.warn(format!("section {title:?} outside any polo, skipped"));
            return self;
        };
        open.category = classify_section(title);
        let Some(category) = open.category else {
            log.warn(format!("unclassified section {title:?}, table skipped"));
            return self;
        };
        let Some(container) = container else {
            log.warn(format!("section {title:?} has no data table"));
            return self;
        };

        let rows: Vec<Vec<String>> = descendant_rows(container)
            .into_iter()
            .map(data_cells)
            .collect();
        let section = extract_section(category, &rows);
        log.event(format!(
            "section {title:?} as {category} ({} layout): {} lines",
            layout_for(category).name,
            section.records.len() + section.discounts.len()
        ));
        if section.skipped > 0 {
            log.event(format!("{} short rows skipped", section.skipped));
        }

        open.data.discounts.extend(section.discounts);
        if let Some(records) = open.data.revenue_mut(category) {
            records.extend(section.records);
        }
        self
    }

    /// Store an aggregate total on the open polo.
    fn total(mut self, kind: TotalKind, value: String, log: &mut ParseLog<'_>) -> Self {
        if let Self::InPolo(open) = &mut self {
            log.event(format!("{kind:?} total: {value}"));
            let slot = match kind {
                TotalKind::Gross => &mut open.data.gross_total,
                TotalKind::Discount => &mut open.data.discount_total,
                TotalKind::Net => &mut open.data.net_total,
            };
            *slot = Some(value);
        }
        self
    }

    /// Keep a row's markup for the summary extractor.
    fn buffer(mut self, row: ElementRef<'_>) -> Self {
        if let Self::InPolo(open) = &mut self {
            open.raw_rows.push(row.html());
        }
        self
    }

    /// Finish the open polo, attaching its summary grid.
    fn close(self, log: &mut ParseLog<'_>) -> Option<ExtractedPoloData> {
        let Self::InPolo(open) = self else {
            return None;
        };
        let OpenPolo {
            mut data, raw_rows, ..
        } = *open;

        data.summary = Some(extract_summary(&raw_rows).unwrap_or_else(|| {
            log.warn(format!("no summary grid for polo {}", data.name));
            SummaryGrid::default()
        }));
        log.event(format!(
            "polo closed: {} ({} lines)",
            data.name,
            data.line_count()
        ));
        Some(data)
    }
}

/// Scan a document into polo blocks, in document order.
pub fn scan(
    doc: &ReportDocument,
    layout: &ReportLayout,
    log: &mut ParseLog<'_>,
) -> Vec<ExtractedPoloData> {
    let rows = doc.top_level_rows(doc.select_first(&layout.details_selector));
    let mut polos = Vec::new();
    let mut state = ScanState::NoPolo;

    let mut index = 0;
    while index < rows.len() {
        let row = rows[index];
        state = match classify_row(row, layout) {
            RowKind::PoloHeader {
                legal_name,
                name,
                banking_info,
            } => state.open_polo(
                ExtractedPoloData::new(legal_name, name, banking_info),
                &mut polos,
                log,
            ),
            RowKind::SectionTitle(title) => {
                let container = rows.get(index + 1).copied();
                if container.is_some() {
                    index += 1;
                }
                state.section(&title, container, log)
            }
            RowKind::Totals(kind, value) => state.total(kind, value, log),
            RowKind::Other => state.buffer(row),
        };
        index += 1;
    }

    polos.extend(state.close(log));
    polos
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = r#"<tr><td style="background-color:#d9e1f2">ACME LTDA</td><td>POLO DE APOIO PRESENCIAL - Campinas</td><td>Banco 001 Ag 1234</td></tr>"#;

    fn grad_row(seq: &str, course: &str) -> String {
        format!(
            "<tr><td>{seq}</td><td>2024{seq}</td><td>000.000.000-0{seq}</td><td>Aluno {seq}</td>\
             <td>{course}</td><td></td><td>Mensalidade</td><td>1</td><td>10/02/2024</td>\
             <td>10/02/2024</td><td>100,00</td><td>40%</td><td>40,00</td></tr>"
        )
    }

    fn run(body: &str) -> (Vec<ExtractedPoloData>, Vec<String>) {
        let doc = ReportDocument::parse(&format!("<html><body><table>{body}</table></body></html>"));
        let mut lines = Vec::new();
        let mut sink = |m: &str| lines.push(m.to_string());
        let polos = scan(&doc, &ReportLayout::default(), &mut ParseLog::new(&mut sink));
        (polos, lines)
    }

    #[test]
    fn test_clean_polo_name() {
        assert_eq!(clean_polo_name("POLO DE APOIO PRESENCIAL - Campinas"), "Campinas");
        assert_eq!(clean_polo_name("Polo: Sorocaba - EAD"), "Sorocaba");
        assert_eq!(clean_polo_name("POLO Jundiaí (EAD)"), "Jundiaí");
        assert_eq!(clean_polo_name("Polonia Centro"), "Polonia Centro");
        assert_eq!(clean_polo_name("  Ribeirão   Preto "), "Ribeirão Preto");
        assert_eq!(clean_polo_name("POLO -"), "POLO -");
    }

    #[test]
    fn test_rows_before_first_polo_are_ignored() {
        let (polos, _) = run(&format!("<tr><td>cabeçalho</td></tr>{HEADER}"));
        assert_eq!(polos.len(), 1);
        assert_eq!(polos[0].legal_name, "ACME LTDA");
        assert_eq!(polos[0].name, "Campinas");
        assert_eq!(polos[0].banking_info, "Banco 001 Ag 1234");
    }

    #[test]
    fn test_section_consumes_next_row() {
        let body = format!(
            r#"{HEADER}
            <tr><td colspan="13"><b>RECEITA GRADUAÇÃO</b></td></tr>
            <tr><td colspan="13"><table>
                <tr><th>Seq</th><th>Matrícula</th></tr>
                {}{}
            </table></td></tr>
            <tr><td><b>VALOR TOTAL BRUTO</b></td><td>200,00</td></tr>
            <tr><td><b>TOTAL LÍQUIDO</b></td><td>80,00</td></tr>"#,
            grad_row("1", "Direito (DIR)"),
            grad_row("2", "Pedagogia"),
        );
        let (polos, lines) = run(&body);
        assert_eq!(polos.len(), 1);
        let polo = &polos[0];
        assert_eq!(polo.graduacao.len(), 2);
        assert_eq!(polo.graduacao[0].course_code, "DIR");
        assert_eq!(polo.gross_total.as_deref(), Some("200,00"));
        assert_eq!(polo.net_total.as_deref(), Some("80,00"));
        assert_eq!(polo.discount_total, None);
        // No RESUMO anchor: default grid and a warning.
        assert_eq!(polo.summary, Some(SummaryGrid::default()));
        assert!(lines.iter().any(|l| l.starts_with("warning: no summary grid")));
    }

    #[test]
    fn test_unclassified_section_skips_its_table() {
        let body = format!(
            r#"{HEADER}
            <tr><td colspan="13"><b>OBSERVAÇÕES</b></td></tr>
            <tr><td><table>{}</table></td></tr>"#,
            grad_row("1", "Direito"),
        );
        let (polos, lines) = run(&body);
        assert_eq!(polos[0].line_count(), 0);
        assert!(lines.iter().any(|l| l.contains("unclassified section")));
    }

    #[test]
    fn test_each_header_closes_previous_polo() {
        let second = HEADER.replace("Campinas", "Sorocaba");
        let (polos, lines) = run(&format!("{HEADER}<tr><td>x</td></tr>{second}"));
        assert_eq!(polos.len(), 2);
        assert_eq!(polos[0].name, "Campinas");
        assert_eq!(polos[1].name, "Sorocaba");
        let opened = lines.iter().filter(|l| l.starts_with("polo opened")).count();
        let closed = lines.iter().filter(|l| l.starts_with("polo closed")).count();
        assert_eq!((opened, closed), (2, 2));
    }

    #[test]
    fn test_summary_is_attached_on_close() {
        let body = format!(
            r#"{HEADER}
            <tr><td colspan="13"><b>RESUMO</b></td></tr>
            <tr><td colspan="13"><table>
                <tr><td>MENSALIDADE</td><td>100,00</td><td>40,00</td></tr>
                <tr><td><b>TOTAL</b></td><td>100,00</td><td>40,00</td></tr>
            </table></td></tr>"#
        );
        let (polos, lines) = run(&body);
        let grid = polos[0].summary.as_ref().unwrap();
        assert_eq!(grid.monthly_fee[0].paid, "100,00");
        assert_eq!(grid.total[0].forwarded, "40,00");
        assert!(!lines.iter().any(|l| l.starts_with("warning")));
    }

    #[test]
    fn test_empty_document() {
        let (polos, lines) = run("");
        assert!(polos.is_empty());
        assert!(lines.is_empty());
    }
}
