//! Text helpers for matching report labels.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Upper-case `s` and strip diacritics.
///
/// Report labels are typed by hand and come with or without accents
/// (`GRADUAÇÃO`, `GRADUACAO`), precomposed or decomposed, so keyword
/// matching always works on the folded form.
///
/// ```
/// use repasse_core::text::fold_upper;
///
/// assert_eq!(fold_upper("Pós-Graduação"), "POS-GRADUACAO");
/// assert_eq!(fold_upper("  serviço "), "SERVICO");
/// ```
#[must_use]
pub fn fold_upper(s: &str) -> String {
    s.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_uppercase)
        .collect()
}

/// Collapse runs of whitespace into single spaces and trim the ends.
#[must_use]
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
