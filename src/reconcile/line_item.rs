//! Line-item model and tolerant field parsing
//!
//! A line item is one row of an itemized document. Each numeric field is
//! independently unparseable-tolerant: bad cells become a sentinel (NaN for
//! money fields, -1 for quantities) instead of failing the extraction.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// One extracted row of an itemized document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub sku: String,
    pub description: String,
    pub qty: i64,
    pub unit_price: f64,
    pub discount_pct: f64,
    pub tax_pct: f64,
}

/// The fixed SKU format accepted by extraction: `A` followed by 4 digits.
pub fn sku_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^A\d{4}$").expect("valid SKU pattern"))
}

/// Parses a money/percentage cell; commas are stripped, anything else
/// unparseable becomes NaN.
pub fn parse_money(raw: &str) -> f64 {
    raw.replace(',', "").trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Parses a quantity cell via float truncation ("3.0" is 3); unparseable
/// cells become -1.
pub fn parse_qty(raw: &str) -> i64 {
    raw.replace(',', "")
        .trim()
        .parse::<f64>()
        .map(|v| v as i64)
        .unwrap_or(-1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sku_pattern_is_strict() {
        assert!(sku_pattern().is_match("A1234"));
        assert!(!sku_pattern().is_match("A123"));
        assert!(!sku_pattern().is_match("B1234"));
        assert!(!sku_pattern().is_match("A12345"));
        assert!(!sku_pattern().is_match(" A1234"));
    }

    #[test]
    fn test_money_parsing_tolerates_garbage() {
        assert_eq!(parse_money("1,234.50"), 1234.5);
        assert_eq!(parse_money(" 10 "), 10.0);
        assert!(parse_money("n/a").is_nan());
        assert!(parse_money("").is_nan());
    }

    #[test]
    fn test_qty_parsing_truncates_and_falls_back() {
        assert_eq!(parse_qty("3"), 3);
        assert_eq!(parse_qty("3.0"), 3);
        assert_eq!(parse_qty("1,000"), 1000);
        assert_eq!(parse_qty("many"), -1);
    }
}
