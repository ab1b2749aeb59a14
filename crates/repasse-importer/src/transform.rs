//! Record transformer: extraction records to canonical financial records.

use crate::log::ParseLog;
use repasse_core::{
    normalize_currency, Category, Decimal, ExtractedData, ExtractedDiscount, ExtractedRecord,
    FinancialRecord, RecordType, ReferencePeriod,
};

/// Batch-wide values stamped on every record of one import.
#[derive(Debug, Clone)]
pub struct TransformContext {
    /// File the report was read from.
    pub source_file: String,
    /// Import kind tag.
    pub import_kind: String,
    /// Shared batch id.
    pub import_id: String,
    /// Reference period of the report.
    pub period: ReferencePeriod,
}

impl TransformContext {
    fn record(
        &self,
        polo: String,
        category: Category,
        kind: RecordType,
        installment: &str,
        amounts: (&str, &str),
    ) -> FinancialRecord {
        FinancialRecord {
            polo,
            category,
            kind,
            installment: parse_installment(installment),
            paid: non_negative(amounts.0),
            forwarded: non_negative(amounts.1),
            reference_month: self.period.month,
            reference_year: self.period.year,
            import_id: self.import_id.clone(),
            source_file: self.source_file.clone(),
            import_kind: self.import_kind.clone(),
            course_code: None,
        }
    }
}

/// Batch id: `"<file>_<timestamp millis>"`.
pub fn import_id(source_file: &str, timestamp_millis: i64) -> String {
    format!("{source_file}_{timestamp_millis}")
}

/// Polo a record is attributed to.
///
/// The student's declared polo wins when it looks like a name: non-empty,
/// longer than two characters and not purely numeric.
pub fn resolve_polo<'a>(student_polo: &'a str, block_polo: &'a str) -> &'a str {
    let student = student_polo.trim();
    let looks_like_name =
        student.chars().count() > 2 && !student.chars().all(|c| c.is_ascii_digit());
    if looks_like_name {
        student
    } else {
        block_polo
    }
}

/// Leading integer digits of an installment cell, 0 when there are none.
///
/// `"3/12"` is installment 3.
pub fn parse_installment(raw: &str) -> u32 {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

fn non_negative(raw: &str) -> Decimal {
    normalize_currency(raw).abs()
}

/// Record type of a launch-type cell.
fn record_type(line: &ExtractedRecord, log: &mut ParseLog<'_>) -> RecordType {
    if line.launch_type.trim().is_empty() {
        return RecordType::Mensalidade;
    }
    RecordType::classify(&line.launch_type).unwrap_or_else(|| {
        log.warn(format!(
            "unknown launch type {:?} for {}, using {}",
            line.launch_type,
            line.student_name,
            RecordType::Mensalidade
        ));
        RecordType::Mensalidade
    })
}

fn revenue_record(
    ctx: &TransformContext,
    category: Category,
    line: &ExtractedRecord,
    block_polo: &str,
    log: &mut ParseLog<'_>,
) -> FinancialRecord {
    let polo = resolve_polo(&line.student_polo, block_polo).to_string();
    let course_code = Some(line.course_code.trim())
        .filter(|code| !code.is_empty())
        .map(str::to_string);
    FinancialRecord {
        course_code,
        ..ctx.record(
            polo,
            category,
            record_type(line, log),
            &line.installment,
            (&line.gross, &line.net),
        )
    }
}

fn discount_record(
    ctx: &TransformContext,
    line: &ExtractedDiscount,
    block_polo: &str,
) -> FinancialRecord {
    ctx.record(
        block_polo.to_string(),
        Category::Desconto,
        RecordType::Desconto,
        &line.installment,
        (&line.gross, &line.net),
    )
}

/// Turn extracted data into canonical records, in document order.
pub fn transform(
    data: &ExtractedData,
    ctx: &TransformContext,
    log: &mut ParseLog<'_>,
) -> Vec<FinancialRecord> {
    let mut records = Vec::new();
    for polo in &data.polos {
        for (category, lines) in polo.revenue() {
            for line in lines {
                records.push(revenue_record(ctx, category, line, &polo.name, log));
            }
        }
        records.extend(
            polo.discounts
                .iter()
                .map(|line| discount_record(ctx, line, &polo.name)),
        );
    }
    log.event(format!(
        "{} records for {} polos, batch {}",
        records.len(),
        data.polos.len(),
        ctx.import_id
    ));
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use repasse_core::ExtractedPoloData;
    use rust_decimal_macros::dec;

    fn ctx() -> TransformContext {
        TransformContext {
            source_file: "repasse.html".to_string(),
            import_kind: "repasse".to_string(),
            import_id: import_id("repasse.html", 1_700_000_000_000),
            period: ReferencePeriod { month: 2, year: 2024 },
        }
    }

    fn line(polo: &str, launch: &str, gross: &str, net: &str) -> ExtractedRecord {
        ExtractedRecord {
            student_name: "Ana".to_string(),
            course_code: "ADM".to_string(),
            student_polo: polo.to_string(),
            launch_type: launch.to_string(),
            installment: "2/6".to_string(),
            gross: gross.to_string(),
            net: net.to_string(),
            ..ExtractedRecord::default()
        }
    }

    fn transform_quiet(data: &ExtractedData) -> (Vec<FinancialRecord>, Vec<String>) {
        let mut lines = Vec::new();
        let mut sink = |m: &str| lines.push(m.to_string());
        let records = transform(data, &ctx(), &mut ParseLog::new(&mut sink));
        (records, lines)
    }

    #[test]
    fn test_resolve_polo() {
        assert_eq!(resolve_polo("12345", "Campinas"), "Campinas");
        assert_eq!(
            resolve_polo("Campinas - Unidade B - SP", "Sorocaba"),
            "Campinas - Unidade B - SP"
        );
        assert_eq!(resolve_polo("", "Campinas"), "Campinas");
        assert_eq!(resolve_polo("SP", "Campinas"), "Campinas");
        assert_eq!(resolve_polo("  Itu ", "Campinas"), "Itu");
    }

    #[test]
    fn test_parse_installment() {
        assert_eq!(parse_installment("3"), 3);
        assert_eq!(parse_installment(" 3/12"), 3);
        assert_eq!(parse_installment("12ª"), 12);
        assert_eq!(parse_installment(""), 0);
        assert_eq!(parse_installment("única"), 0);
    }

    #[test]
    fn test_import_id() {
        assert_eq!(import_id("a.html", 42), "a.html_42");
    }

    #[test]
    fn test_transform_revenue_and_discounts() {
        let mut polo = ExtractedPoloData::new("ACME", "Campinas", "");
        polo.graduacao.push(line("", "", "1.000,50", "400,20"));
        polo.universo_ead.push(line("Itu", "Acordo", "-10,00", "-4,00"));
        polo.discounts.push(ExtractedDiscount {
            installment: "1".to_string(),
            gross: "-50,00".to_string(),
            net: "-20,00".to_string(),
            ..ExtractedDiscount::default()
        });
        let data = ExtractedData {
            polos: vec![polo],
            ..ExtractedData::default()
        };

        let (records, _) = transform_quiet(&data);
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].polo, "Campinas");
        assert_eq!(records[0].category, Category::Graduacao);
        assert_eq!(records[0].kind, RecordType::Mensalidade);
        assert_eq!(records[0].installment, 2);
        assert_eq!(records[0].paid, dec!(1000.50));
        assert_eq!(records[0].forwarded, dec!(400.20));
        assert_eq!(records[0].course_code.as_deref(), Some("ADM"));
        assert_eq!(records[0].reference_month, 2);
        assert_eq!(records[0].import_id, "repasse.html_1700000000000");

        assert_eq!(records[1].polo, "Itu");
        assert_eq!(records[1].category, Category::UniversoEad);
        assert_eq!(records[1].kind, RecordType::Acordo);
        assert_eq!(records[1].paid, dec!(10.00));

        assert_eq!(records[2].category, Category::Desconto);
        assert_eq!(records[2].kind, RecordType::Desconto);
        assert_eq!(records[2].polo, "Campinas");
        assert_eq!(records[2].forwarded, dec!(20.00));
        assert_eq!(records[2].course_code, None);
    }

    #[test]
    fn test_unknown_launch_type_warns() {
        let mut polo = ExtractedPoloData::new("ACME", "Campinas", "");
        polo.tecnico.push(line("", "Rematrícula", "1,00", "1,00"));
        let data = ExtractedData {
            polos: vec![polo],
            ..ExtractedData::default()
        };
        let (records, lines) = transform_quiet(&data);
        assert_eq!(records[0].kind, RecordType::Mensalidade);
        assert!(lines[0].starts_with("warning: unknown launch type"));
    }
}
