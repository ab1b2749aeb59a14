//! Normalization of locale-ambiguous currency strings.
//!
//! Reports reach us from more than one generator. Some write amounts the
//! Brazilian way (`1.234,56`), others the US way (`1,234.56`), and a cell may
//! carry a `R$` prefix or a lone `-` for "nothing". The separator that appears
//! rightmost is taken as the decimal separator. Trailing text after the
//! number (`12,30*`, `100,00 (est.)`) is ignored.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Currency symbol stripped before parsing.
const CURRENCY_SYMBOL: &str = "R$";

/// Convert a raw amount cell into a [`Decimal`].
///
/// Never fails: only the leading numeric part of the cell is read, and
/// empty cells, `"-"` and text without a leading number yield zero.
///
/// # Examples
///
/// ```
/// use repasse_core::normalize_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(normalize_currency("1.234,56"), dec!(1234.56));
/// assert_eq!(normalize_currency("1,234.56"), dec!(1234.56));
/// assert_eq!(normalize_currency("R$ 10,00"), dec!(10.00));
/// assert_eq!(normalize_currency("-"), dec!(0));
/// ```
#[must_use]
pub fn normalize_currency(raw: &str) -> Decimal {
    let cleaned: String = raw
        .replace(CURRENCY_SYMBOL, "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let number = numeric_prefix(&cleaned);
    if number.is_empty() || number == "-" {
        return Decimal::ZERO;
    }

    // `None` orders before `Some`, so a lone comma counts as rightmost.
    let canonical = if number.rfind(',') > number.rfind('.') {
        number.replace('.', "").replace(',', ".")
    } else {
        number.replace(',', "")
    };

    Decimal::from_str(&canonical).unwrap_or(Decimal::ZERO)
}

/// Leading sign, digits and separators of `s`, without trailing separators.
fn numeric_prefix(s: &str) -> &str {
    let end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || c == ',' || (i == 0 && c == '-')))
        .map_or(s.len(), |(i, _)| i);
    s[..end].trim_end_matches(['.', ','])
}
