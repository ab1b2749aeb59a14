//! Totals of canonical records per polo and category.

use crate::record::{Category, FinancialRecord};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregated amounts of one (polo, category) group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    /// Polo of the group.
    pub polo: String,
    /// Category of the group.
    pub category: Category,
    /// Number of records in the group.
    pub count: usize,
    /// Sum of paid amounts.
    pub paid: Decimal,
    /// Sum of forwarded amounts.
    pub forwarded: Decimal,
}

/// Group records by polo and category and sum their amounts.
///
/// Groups come out ordered by polo name, then by category in report order.
/// Sums saturate at [`Decimal::MAX`].
pub fn aggregate(records: &[FinancialRecord]) -> Vec<CategoryTotals> {
    let mut groups: BTreeMap<(&str, Category), CategoryTotals> = BTreeMap::new();

    for record in records {
        let entry = groups
            .entry((record.polo.as_str(), record.category))
            .or_insert_with(|| CategoryTotals {
                polo: record.polo.clone(),
                category: record.category,
                count: 0,
                paid: Decimal::ZERO,
                forwarded: Decimal::ZERO,
            });
        entry.count += 1;
        entry.paid = entry.paid.saturating_add(record.paid);
        entry.forwarded = entry.forwarded.saturating_add(record.forwarded);
    }

    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordType;
    use rust_decimal_macros::dec;

    fn record(polo: &str, category: Category, paid: Decimal, forwarded: Decimal) -> FinancialRecord {
        FinancialRecord {
            polo: polo.to_string(),
            category,
            kind: RecordType::Mensalidade,
            installment: 1,
            paid,
            forwarded,
            reference_month: 1,
            reference_year: 2024,
            import_id: "x_1".to_string(),
            source_file: "x".to_string(),
            import_kind: "repasse".to_string(),
            course_code: None,
        }
    }

    #[test]
    fn test_aggregate_groups_and_sums() {
        let records = vec![
            record("Sorocaba", Category::Tecnico, dec!(100), dec!(40)),
            record("Campinas", Category::Graduacao, dec!(200), dec!(80)),
            record("Campinas", Category::Graduacao, dec!(50.50), dec!(20.20)),
            record("Campinas", Category::Desconto, dec!(10), dec!(4)),
        ];

        let totals = aggregate(&records);
        assert_eq!(totals.len(), 3);

        assert_eq!(totals[0].polo, "Campinas");
        assert_eq!(totals[0].category, Category::Graduacao);
        assert_eq!(totals[0].count, 2);
        assert_eq!(totals[0].paid, dec!(250.50));
        assert_eq!(totals[0].forwarded, dec!(100.20));

        assert_eq!(totals[1].category, Category::Desconto);
        assert_eq!(totals[2].polo, "Sorocaba");
    }

    #[test]
    fn test_aggregate_saturates() {
        let records = vec![
            record("Itu", Category::Graduacao, Decimal::MAX, Decimal::MAX),
            record("Itu", Category::Graduacao, Decimal::MAX, dec!(1)),
        ];
        let totals = aggregate(&records);
        assert_eq!(totals[0].paid, Decimal::MAX);
        assert_eq!(totals[0].forwarded, Decimal::MAX);
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate(&[]).is_empty());
    }
}
