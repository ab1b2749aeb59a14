//! Reference-period parsing.
//!
//! The report header carries a label such as `REPASSE FEVEREIRO/2023`. The
//! month and the year are resolved independently; whichever part cannot be
//! read falls back to the current month or year.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix token some generators put before the month name.
const PREFIX_TOKEN: &str = "repasse";

/// Month names as written in reports, lower-cased.
const MONTHS: &[(&str, u32)] = &[
    ("janeiro", 1),
    ("fevereiro", 2),
    ("março", 3),
    ("marco", 3),
    ("abril", 4),
    ("maio", 5),
    ("junho", 6),
    ("julho", 7),
    ("agosto", 8),
    ("setembro", 9),
    ("outubro", 10),
    ("novembro", 11),
    ("dezembro", 12),
];

/// A month/year pair the records of a report refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReferencePeriod {
    /// Month, always in `1..=12`.
    pub month: u32,
    /// Four-digit year.
    pub year: i32,
}

impl ReferencePeriod {
    /// The period containing the given date.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            year: date.year(),
        }
    }
}

impl fmt::Display for ReferencePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

/// Parse a reference-period label, falling back to the current local date.
#[must_use]
pub fn parse_reference_period(label: Option<&str>) -> ReferencePeriod {
    parse_reference_period_at(label, Local::now().date_naive())
}

/// Parse a reference-period label, falling back to the period of `today`.
///
/// # Examples
///
/// ```
/// use repasse_core::parse_reference_period_at;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2025, 7, 10).unwrap();
///
/// let period = parse_reference_period_at(Some("JANEIRO/2024"), today);
/// assert_eq!((period.month, period.year), (1, 2024));
///
/// // Unknown month, valid year: only the month falls back.
/// let period = parse_reference_period_at(Some("xyz/2022"), today);
/// assert_eq!((period.month, period.year), (7, 2022));
/// ```
#[must_use]
pub fn parse_reference_period_at(label: Option<&str>, today: NaiveDate) -> ReferencePeriod {
    let fallback = ReferencePeriod::containing(today);

    let Some(label) = label.map(str::trim).filter(|l| !l.is_empty()) else {
        tracing::debug!("empty reference label, using {fallback}");
        return fallback;
    };

    let lowered = label.to_lowercase();
    let trimmed = lowered.trim();
    let body = trimmed.strip_prefix(PREFIX_TOKEN).unwrap_or(trimmed).trim();

    let parts: Vec<&str> = body.split('/').map(str::trim).collect();
    if parts.len() < 2 {
        tracing::debug!("reference label {label:?} has no month/year split, using {fallback}");
        return fallback;
    }

    let month = MONTHS
        .iter()
        .find(|(name, _)| *name == parts[0])
        .map_or(fallback.month, |&(_, number)| number);
    let year = parts[1].parse::<i32>().unwrap_or(fallback.year);

    ReferencePeriod { month, year }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 15).unwrap()
    }

    #[test]
    fn test_plain_label() {
        let p = parse_reference_period_at(Some("JANEIRO/2024"), today());
        assert_eq!(p, ReferencePeriod { month: 1, year: 2024 });
    }

    #[test]
    fn test_prefixed_label() {
        let p = parse_reference_period_at(Some("REPASSE FEVEREIRO/2023"), today());
        assert_eq!(p, ReferencePeriod { month: 2, year: 2023 });
    }

    #[test]
    fn test_accent_variants() {
        let accented = parse_reference_period_at(Some("Março/2024"), today());
        let plain = parse_reference_period_at(Some("MARCO/2024"), today());
        assert_eq!(accented.month, 3);
        assert_eq!(plain.month, 3);
    }

    #[test]
    fn test_missing_label_falls_back() {
        let p = parse_reference_period_at(None, today());
        assert_eq!(p, ReferencePeriod { month: 9, year: 2025 });

        let p = parse_reference_period_at(Some("   "), today());
        assert_eq!(p, ReferencePeriod { month: 9, year: 2025 });
    }

    #[test]
    fn test_no_separator_falls_back_entirely() {
        let p = parse_reference_period_at(Some("xyz"), today());
        assert_eq!(p, ReferencePeriod { month: 9, year: 2025 });
    }

    #[test]
    fn test_partial_fallback() {
        let p = parse_reference_period_at(Some("xyz/2022"), today());
        assert_eq!(p, ReferencePeriod { month: 9, year: 2022 });

        let p = parse_reference_period_at(Some("maio/20x4"), today());
        assert_eq!(p, ReferencePeriod { month: 5, year: 2025 });
    }

    #[test]
    fn test_spaces_around_separator() {
        let p = parse_reference_period_at(Some("Repasse Dezembro / 2023"), today());
        assert_eq!(p, ReferencePeriod { month: 12, year: 2023 });
    }

    #[test]
    fn test_display() {
        let p = ReferencePeriod { month: 3, year: 2024 };
        assert_eq!(p.to_string(), "03/2024");
    }
}
