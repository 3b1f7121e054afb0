//! Best-effort numeric coercion for the heterogeneous raw columns.
//!
//! Both parsers are total: malformed input becomes `None` for the imputation
//! stage to repair, never an error.

use std::sync::OnceLock;

use regex::Regex;

fn non_numeric() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9.]").expect("pattern is valid"))
}

/// Extracts a non-negative cost from a raw price field.
///
/// Handles currency symbols (`$123.45`), currency codes (`USD 80.00`),
/// thousands separators (`1,200.00`), and unit suffixes by stripping every
/// character that is not a digit or a decimal point. Text without any digit
/// (`Quote Pending`) and leftovers that still fail to parse (`1.2.3`) yield
/// `None`.
pub fn coerce_cost(raw: Option<&str>) -> Option<f64> {
    let text = raw?.trim();
    if !text.chars().any(|ch| ch.is_ascii_digit()) {
        return None;
    }
    let stripped = non_numeric().replace_all(text, "");
    stripped.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Extracts a quantity from a raw stock field, discarding non-numeric
/// trailing content (`150 pcs` parses as 150). Negative values pass through;
/// outlier correction clamps them later.
pub fn coerce_stock(raw: Option<&str>) -> Option<f64> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }
    let numeric_len: usize = text
        .chars()
        .take_while(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+'))
        .map(char::len_utf8)
        .sum();
    text[..numeric_len]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
