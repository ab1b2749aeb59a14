//! Rendering of import results and reconciliation issues.

use anyhow::Result;
use repasse_core::{aggregate, FinancialRecord};
use repasse_importer::{ImportResult, ReconciliationIssue};
use serde::Serialize;
use std::io::Write;

/// Flat CSV row. Every record has the same columns, course code included.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    polo: &'a str,
    categoria: &'a str,
    tipo: &'a str,
    parcela: u32,
    valor_pago: String,
    valor_repasse: String,
    referencia_mes: u32,
    referencia_ano: i32,
    import_id: &'a str,
    arquivo_origem: &'a str,
    tipo_importacao: &'a str,
    codigo_curso: &'a str,
}

impl<'a> From<&'a FinancialRecord> for CsvRow<'a> {
    fn from(r: &'a FinancialRecord) -> Self {
        Self {
            polo: &r.polo,
            categoria: r.category.label(),
            tipo: r.kind.label(),
            parcela: r.installment,
            valor_pago: r.paid.to_string(),
            valor_repasse: r.forwarded.to_string(),
            referencia_mes: r.reference_month,
            referencia_ano: r.reference_year,
            import_id: &r.import_id,
            arquivo_origem: &r.source_file,
            tipo_importacao: &r.import_kind,
            codigo_curso: r.course_code.as_deref().unwrap_or_default(),
        }
    }
}

/// Records as a pretty-printed JSON array.
pub fn write_json<W: Write>(records: &[FinancialRecord], writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, records)?;
    writeln!(writer)?;
    Ok(())
}

/// Records as CSV with a header row.
pub fn write_csv<W: Write>(records: &[FinancialRecord], writer: &mut W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for record in records {
        csv.serialize(CsvRow::from(record))?;
    }
    csv.flush()?;
    Ok(())
}

/// Per-polo, per-category totals.
pub fn write_summary<W: Write>(result: &ImportResult, writer: &mut W) -> Result<()> {
    writeln!(writer, "Import:  {}", result.import_id)?;
    writeln!(writer, "File:    {}", result.source_file)?;
    writeln!(writer, "Period:  {}", result.period)?;
    writeln!(writer, "Records: {}", result.records.len())?;
    writeln!(writer)?;

    let totals = aggregate(&result.records);
    let polo_width = totals
        .iter()
        .map(|t| t.polo.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);
    writeln!(
        writer,
        "{:<polo_width$}  {:<26}  {:>5}  {:>12}  {:>12}",
        "Polo", "Categoria", "Qtd", "Pago", "Repasse"
    )?;
    for t in &totals {
        writeln!(
            writer,
            "{:<polo_width$}  {:<26}  {:>5}  {:>12}  {:>12}",
            t.polo,
            t.category.label(),
            t.count,
            t.paid.round_dp(2),
            t.forwarded.round_dp(2)
        )?;
    }

    let log = result.import_log();
    writeln!(
        writer,
        "{:<polo_width$}  {:<26}  {:>5}  {:>12}  {:>12}",
        "Total",
        "",
        log.record_count,
        log.paid_total.round_dp(2),
        log.forwarded_total.round_dp(2)
    )?;

    if !result.issues.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "{} reconciliation issue(s)", result.issues.len())?;
    }
    Ok(())
}

/// One line per issue.
pub fn write_issues_text<W: Write>(issues: &[ReconciliationIssue], writer: &mut W) -> Result<()> {
    for issue in issues {
        writeln!(writer, "{issue}")?;
    }
    Ok(())
}

/// JSON document listing the issues of one file.
#[derive(Debug, Serialize)]
pub struct JsonIssues<'a> {
    /// Report file name.
    pub file: &'a str,
    /// Number of polo blocks checked.
    pub polos: usize,
    /// The issues found.
    pub issues: &'a [ReconciliationIssue],
}

/// Issues as a JSON document.
pub fn write_issues_json<W: Write>(report: &JsonIssues<'_>, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use repasse_core::{Category, RecordType, ReferencePeriod};
    use rust_decimal_macros::dec;

    fn record(polo: &str, category: Category, course_code: Option<&str>) -> FinancialRecord {
        FinancialRecord {
            polo: polo.to_string(),
            category,
            kind: RecordType::Mensalidade,
            installment: 1,
            paid: dec!(100.00),
            forwarded: dec!(40.00),
            reference_month: 2,
            reference_year: 2024,
            import_id: "r.html_1".to_string(),
            source_file: "r.html".to_string(),
            import_kind: "repasse".to_string(),
            course_code: course_code.map(str::to_string),
        }
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_csv_has_fixed_columns() {
        let records = vec![
            record("Itu", Category::Graduacao, Some("DIR")),
            record("Itu", Category::Desconto, None),
        ];
        let out = render(|w| write_csv(&records, w));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("polo,categoria,tipo,parcela,valor_pago"));
        assert!(lines[0].ends_with("codigo_curso"));
        assert!(lines[1].starts_with("Itu,Receita Graduação,Mensalidade,1,100.00,40.00,2,2024"));
        assert!(lines[1].ends_with(",DIR"));
        assert!(lines[2].ends_with(','));
    }

    #[test]
    fn test_json_uses_storage_names() {
        let records = vec![record("Itu", Category::Tecnico, None)];
        let out = render(|w| write_json(&records, w));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["categoria"], "Receita Técnico");
        assert_eq!(value[0]["referencia_mes"], 2);
    }

    #[test]
    fn test_summary_totals() {
        let result = ImportResult {
            import_id: "r.html_1".to_string(),
            source_file: "r.html".to_string(),
            import_kind: "repasse".to_string(),
            period: ReferencePeriod { month: 2, year: 2024 },
            imported_at: Default::default(),
            records: vec![
                record("Itu", Category::Graduacao, None),
                record("Itu", Category::Graduacao, None),
                record("Salto", Category::Tecnico, None),
            ],
            errors: Vec::new(),
            issues: Vec::new(),
        };
        let out = render(|w| write_summary(&result, w));
        assert!(out.contains("Period:  02/2024"));
        assert!(out.contains("Receita Graduação"));
        let total = out.lines().last().unwrap();
        assert!(total.starts_with("Total"));
        assert!(total.contains("300.00"));
        assert!(total.contains("120.00"));
    }

    #[test]
    fn test_issues_json() {
        let issues = vec![ReconciliationIssue {
            polo: "Itu".to_string(),
            check: "gross total".to_string(),
            reported: dec!(10),
            detailed: dec!(9),
        }];
        let out = render(|w| {
            write_issues_json(
                &JsonIssues {
                    file: "r.html",
                    polos: 1,
                    issues: &issues,
                },
                w,
            )
        });
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["issues"][0]["check"], "gross total");
        assert_eq!(value["polos"], 1);

        let text = render(|w| write_issues_text(&issues, w));
        assert_eq!(text.lines().count(), 1);
    }
}
