//! Line-item comparison
//!
//! Outer-joins two item sets on SKU and compares each joined row field by
//! field. Quantities compare exactly; money and percentage fields compare by
//! absolute difference with a tolerance of 0.01 (differences at or below
//! tolerance are not reported). Rows with zero issues are omitted from the
//! report entirely.

use std::collections::BTreeMap;

use serde::Serialize;

use super::line_item::LineItem;

/// Tolerance for unit price, discount, and tax comparisons. The comparison
/// is strictly greater-than: a difference of exactly 0.01 is not flagged.
pub const NUMERIC_TOLERANCE: f64 = 0.01;

/// One flagged condition on a joined row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Issue {
    #[serde(rename = "MISSING_IN_PI")]
    MissingInPi,
    #[serde(rename = "MISSING_IN_PO")]
    MissingInPo,
    #[serde(rename = "QTY_MISMATCH")]
    QtyMismatch,
    #[serde(rename = "UNIT_PRICE_MISMATCH")]
    UnitPriceMismatch,
    #[serde(rename = "DISCOUNT_MISMATCH")]
    DiscountMismatch,
    #[serde(rename = "TAX_MISMATCH")]
    TaxMismatch,
}

impl Issue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Issue::MissingInPi => "MISSING_IN_PI",
            Issue::MissingInPo => "MISSING_IN_PO",
            Issue::QtyMismatch => "QTY_MISMATCH",
            Issue::UnitPriceMismatch => "UNIT_PRICE_MISMATCH",
            Issue::DiscountMismatch => "DISCOUNT_MISMATCH",
            Issue::TaxMismatch => "TAX_MISMATCH",
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One flagged SKU with its full issue list and both sides' values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discrepancy {
    pub sku: String,
    pub issues: Vec<Issue>,
    pub po: Option<LineItem>,
    pub pi: Option<LineItem>,
}

/// Comparison totals alongside the discrepancy list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub po_items: usize,
    pub pi_items: usize,
    pub discrepancy_count: usize,
    pub skus_with_issues: Vec<String>,
}

/// Compares two extracted item sets and returns the flagged rows plus a
/// summary. Output order is ascending by SKU, so the report is deterministic
/// for a given pair of inputs. Duplicate SKUs within one document collapse
/// to their first occurrence, so each SKU yields exactly one report row.
pub fn compare_items(po: &[LineItem], pi: &[LineItem]) -> (Vec<Discrepancy>, Summary) {
    let mut joined: BTreeMap<&str, (Option<&LineItem>, Option<&LineItem>)> = BTreeMap::new();
    for item in po {
        joined.entry(&item.sku).or_insert((None, None)).0.get_or_insert(item);
    }
    for item in pi {
        joined.entry(&item.sku).or_insert((None, None)).1.get_or_insert(item);
    }

    let mut discrepancies = Vec::new();
    for (sku, (po_item, pi_item)) in joined {
        let mut issues = Vec::new();

        match (po_item, pi_item) {
            (Some(_), None) => issues.push(Issue::MissingInPi),
            (None, Some(_)) => issues.push(Issue::MissingInPo),
            (Some(po_item), Some(pi_item)) => {
                if po_item.qty != pi_item.qty {
                    issues.push(Issue::QtyMismatch);
                }
                if differs(po_item.unit_price, pi_item.unit_price) {
                    issues.push(Issue::UnitPriceMismatch);
                }
                if differs(po_item.discount_pct, pi_item.discount_pct) {
                    issues.push(Issue::DiscountMismatch);
                }
                if differs(po_item.tax_pct, pi_item.tax_pct) {
                    issues.push(Issue::TaxMismatch);
                }
            }
            (None, None) => unreachable!("joined rows have at least one side"),
        }

        if !issues.is_empty() {
            discrepancies.push(Discrepancy {
                sku: sku.to_string(),
                issues,
                po: po_item.cloned(),
                pi: pi_item.cloned(),
            });
        }
    }

    let summary = Summary {
        po_items: po.len(),
        pi_items: pi.len(),
        discrepancy_count: discrepancies.len(),
        skus_with_issues: discrepancies.iter().map(|d| d.sku.clone()).collect(),
    };
    (discrepancies, summary)
}

/// Absolute-difference comparison at [`NUMERIC_TOLERANCE`].
///
/// A NaN sentinel on either side yields a NaN difference, which is not
/// greater than the tolerance, so absent-or-unparseable values never produce
/// a mismatch on their own.
fn differs(a: f64, b: f64) -> bool {
    (a - b).abs() > NUMERIC_TOLERANCE
}
