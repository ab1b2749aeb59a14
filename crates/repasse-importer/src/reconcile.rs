//! Cross-check of detailed lines against the report's own summaries.
//!
//! Each polo carries a summary grid and up to three aggregate totals. The
//! detailed lines should add up to them; differences above the tolerance
//! become advisory issues.

use repasse_core::{
    normalize_currency, Decimal, ExtractedData, ExtractedPoloData, ExtractedRecord, RecordType,
    SummaryCell, SummaryGrid,
};
use serde::Serialize;
use std::fmt;

/// A summary value the detailed lines do not add up to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationIssue {
    /// Polo display name.
    pub polo: String,
    /// What was compared, e.g. `Mensalidade / Receita Graduação paid`.
    pub check: String,
    /// Value printed in the report.
    pub reported: Decimal,
    /// Sum of the detailed lines.
    pub detailed: Decimal,
}

impl ReconciliationIssue {
    /// Absolute difference between reported and detailed values.
    pub fn difference(&self) -> Decimal {
        (self.reported - self.detailed).abs()
    }
}

impl fmt::Display for ReconciliationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: report {} vs lines {} (diff {})",
            self.polo,
            self.check,
            self.reported,
            self.detailed,
            self.difference()
        )
    }
}

fn amount(raw: &str) -> Decimal {
    normalize_currency(raw).abs()
}

fn line_type(line: &ExtractedRecord) -> RecordType {
    RecordType::classify(&line.launch_type).unwrap_or(RecordType::Mensalidade)
}

/// Paid and forwarded sums of some lines, saturating at [`Decimal::MAX`].
fn sums<'a>(lines: impl Iterator<Item = &'a ExtractedRecord>) -> (Decimal, Decimal) {
    lines.fold((Decimal::ZERO, Decimal::ZERO), |(paid, fwd), line| {
        (
            paid.saturating_add(amount(&line.gross)),
            fwd.saturating_add(amount(&line.net)),
        )
    })
}

/// Compare every polo of a report against its summary grid and totals.
///
/// A grid left at its all-zero default is treated as missing.
pub fn reconcile(data: &ExtractedData, tolerance: Decimal) -> Vec<ReconciliationIssue> {
    let mut issues = Vec::new();
    for polo in &data.polos {
        reconcile_polo(polo, tolerance, &mut issues);
    }
    issues
}

fn reconcile_polo(
    polo: &ExtractedPoloData,
    tolerance: Decimal,
    issues: &mut Vec<ReconciliationIssue>,
) {
    let mut check = |check: String, reported: Decimal, detailed: Decimal| {
        if (reported - detailed).abs() > tolerance {
            issues.push(ReconciliationIssue {
                polo: polo.name.clone(),
                check,
                reported,
                detailed,
            });
        }
    };

    let grid = polo
        .summary
        .as_ref()
        .filter(|grid| **grid != SummaryGrid::default());
    if let Some(grid) = grid {
        let rows: [(&str, &[SummaryCell; 5], Option<RecordType>); 4] = [
            ("Mensalidade", &grid.monthly_fee, Some(RecordType::Mensalidade)),
            ("Serviço", &grid.service, Some(RecordType::Servico)),
            ("Acordo", &grid.agreement, Some(RecordType::Acordo)),
            ("Total", &grid.total, None),
        ];
        for (slot, (category, lines)) in polo.revenue().into_iter().enumerate() {
            for (row, cells, kind) in &rows {
                let (paid, forwarded) = sums(
                    lines
                        .iter()
                        .filter(|line| kind.map_or(true, |kind| line_type(line) == kind)),
                );
                let cell = &cells[slot];
                check(format!("{row} / {category} paid"), amount(&cell.paid), paid);
                check(
                    format!("{row} / {category} forwarded"),
                    amount(&cell.forwarded),
                    forwarded,
                );
            }
        }
    }

    let (gross, net) = sums(polo.revenue().iter().flat_map(|(_, lines)| lines.iter()));
    let (discount_gross, discount_net) = polo
        .discounts
        .iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(g, n), line| {
            (
                g.saturating_add(amount(&line.gross)),
                n.saturating_add(amount(&line.net)),
            )
        });

    if let Some(raw) = &polo.gross_total {
        check("gross total".to_string(), amount(raw), gross);
    }
    if let Some(raw) = &polo.discount_total {
        check("discount total".to_string(), amount(raw), discount_gross);
    }
    if let Some(raw) = &polo.net_total {
        check("net total".to_string(), amount(raw), net - discount_net);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repasse_core::ExtractedDiscount;
    use rust_decimal_macros::dec;

    fn line(launch: &str, gross: &str, net: &str) -> ExtractedRecord {
        ExtractedRecord {
            launch_type: launch.to_string(),
            gross: gross.to_string(),
            net: net.to_string(),
            ..ExtractedRecord::default()
        }
    }

    fn polo() -> ExtractedPoloData {
        let mut polo = ExtractedPoloData::new("ACME", "Campinas", "");
        polo.graduacao.push(line("Mensalidade", "100,00", "40,00"));
        polo.graduacao.push(line("", "50,00", "20,00"));
        polo.graduacao.push(line("Serviço", "10,00", "5,00"));
        polo.discounts.push(ExtractedDiscount {
            gross: "-15,00".to_string(),
            net: "-6,00".to_string(),
            ..ExtractedDiscount::default()
        });

        let mut grid = SummaryGrid::default();
        grid.monthly_fee[0] = SummaryCell::new("150,00", "60,00");
        grid.service[0] = SummaryCell::new("10,00", "5,00");
        grid.total[0] = SummaryCell::new("160,00", "65,00");
        polo.summary = Some(grid);
        polo.gross_total = Some("160,00".to_string());
        polo.discount_total = Some("15,00".to_string());
        polo.net_total = Some("59,00".to_string());
        polo
    }

    fn data(polo: ExtractedPoloData) -> ExtractedData {
        ExtractedData {
            polos: vec![polo],
            ..ExtractedData::default()
        }
    }

    #[test]
    fn test_huge_amounts_saturate() {
        const MAX: &str = "79228162514264337593543950335";
        let mut polo = ExtractedPoloData::new("ACME", "Itu", "");
        polo.graduacao.push(line("Mensalidade", MAX, MAX));
        polo.graduacao.push(line("Mensalidade", MAX, "1,00"));
        polo.gross_total = Some("10,00".to_string());

        let issues = reconcile(&data(polo), dec!(0.01));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].detailed, Decimal::MAX);
    }

    #[test]
    fn test_consistent_report_has_no_issues() {
        assert!(reconcile(&data(polo()), dec!(0.01)).is_empty());
    }

    #[test]
    fn test_grid_mismatch_is_reported() {
        let mut polo = polo();
        if let Some(grid) = polo.summary.as_mut() {
            grid.service[0] = SummaryCell::new("12,00", "5,00");
        }
        let issues = reconcile(&data(polo), dec!(0.01));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].check, "Serviço / Receita Graduação paid");
        assert_eq!(issues[0].reported, dec!(12.00));
        assert_eq!(issues[0].detailed, dec!(10.00));
        assert_eq!(issues[0].difference(), dec!(2.00));
    }

    #[test]
    fn test_tolerance() {
        let mut polo = polo();
        polo.gross_total = Some("160,01".to_string());
        assert!(reconcile(&data(polo.clone()), dec!(0.01)).is_empty());
        assert_eq!(reconcile(&data(polo), dec!(0.001)).len(), 1);
    }

    #[test]
    fn test_default_grid_is_skipped() {
        let mut polo = polo();
        polo.summary = Some(SummaryGrid::default());
        polo.gross_total = None;
        polo.discount_total = None;
        polo.net_total = None;
        assert!(reconcile(&data(polo), dec!(0.01)).is_empty());
    }

    #[test]
    fn test_net_total_accounts_for_discounts() {
        let mut polo = polo();
        polo.net_total = Some("65,00".to_string());
        let issues = reconcile(&data(polo), dec!(0.01));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].check, "net total");
        assert_eq!(issues[0].detailed, dec!(59.00));
        assert!(issues[0].to_string().starts_with("Campinas: net total"));
    }
}
