//! Line-item extraction from semi-structured documents
//!
//! Locates a table whose header mentions the expected fields, maps header
//! text fragments case-insensitively to field positions, and accepts only
//! rows whose first cell matches the SKU pattern. A document that yields
//! zero line items is a hard failure: it invalidates the whole comparison.

use std::path::Path;

use super::errors::{ReconcileError, ReconcileResult};
use super::line_item::{parse_money, parse_qty, sku_pattern, LineItem};

/// The six fields a line-item table may carry, in layout-independent form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Sku,
    Description,
    Qty,
    UnitPrice,
    Discount,
    Tax,
}

impl Field {
    /// Header fragments that identify this field, most specific first.
    fn fragments(&self) -> &'static [&'static str] {
        match self {
            Field::Sku => &["sku"],
            Field::Description => &["description"],
            Field::Qty => &["qty"],
            Field::UnitPrice => &["unit price", "price"],
            Field::Discount => &["discount"],
            Field::Tax => &["tax %", "tax"],
        }
    }
}

/// Column order recovered from one header line.
#[derive(Debug, Clone)]
struct ColumnLayout {
    /// Present fields, ordered left to right by header offset.
    fields: Vec<Field>,
}

impl ColumnLayout {
    /// Recovers a layout from a header line, or None when the line is not a
    /// recognizable line-item header. SKU, qty, and unit price are required.
    fn from_header(line: &str) -> Option<Self> {
        let lowered = line.to_lowercase();
        if !lowered.contains("sku") || !lowered.contains("qty") {
            return None;
        }

        let mut positioned: Vec<(usize, Field)> = [
            Field::Sku,
            Field::Description,
            Field::Qty,
            Field::UnitPrice,
            Field::Discount,
            Field::Tax,
        ]
        .iter()
        .filter_map(|field| {
            field
                .fragments()
                .iter()
                .find_map(|fragment| lowered.find(fragment))
                .map(|offset| (offset, *field))
        })
        .collect();

        let has = |f: Field| positioned.iter().any(|(_, pf)| *pf == f);
        if !has(Field::Sku) || !has(Field::Qty) || !has(Field::UnitPrice) {
            return None;
        }

        positioned.sort_by_key(|(offset, _)| *offset);
        Some(Self {
            fields: positioned.into_iter().map(|(_, f)| f).collect(),
        })
    }

    /// Parses one data row under this layout. The description column absorbs
    /// any surplus whitespace-separated tokens; every other column is exactly
    /// one token. Rows whose SKU cell fails the pattern are rejected.
    fn parse_row(&self, line: &str) -> Option<LineItem> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let fixed = self.fields.len();
        let has_description = self.fields.contains(&Field::Description);

        if tokens.len() < fixed || (!has_description && tokens.len() != fixed) {
            return None;
        }
        let surplus = tokens.len() - fixed;

        let mut sku = String::new();
        let mut description = String::new();
        let mut qty = -1i64;
        let mut unit_price = f64::NAN;
        // Absent discount/tax columns default to zero, not NaN.
        let mut discount_pct = 0.0f64;
        let mut tax_pct = 0.0f64;

        let mut idx = 0;
        for field in &self.fields {
            match field {
                Field::Description => {
                    description = tokens[idx..=idx + surplus].join(" ");
                    idx += surplus + 1;
                }
                other => {
                    let token = tokens[idx];
                    idx += 1;
                    match other {
                        Field::Sku => sku = token.to_string(),
                        Field::Qty => qty = parse_qty(token),
                        Field::UnitPrice => unit_price = parse_money(token),
                        Field::Discount => discount_pct = parse_money(token),
                        Field::Tax => tax_pct = parse_money(token),
                        Field::Description => unreachable!(),
                    }
                }
            }
        }

        if !sku_pattern().is_match(&sku) {
            return None;
        }

        Some(LineItem {
            sku,
            description,
            qty,
            unit_price,
            discount_pct,
            tax_pct,
        })
    }
}

/// Parses every recognizable line-item table in a block of text.
///
/// An empty result is not an error here; callers enforce the zero-items rule
/// per document.
pub fn parse_line_items(text: &str) -> Vec<LineItem> {
    let mut items = Vec::new();
    let mut layout: Option<ColumnLayout> = None;

    for line in text.lines() {
        if let Some(found) = ColumnLayout::from_header(line) {
            layout = Some(found);
            continue;
        }
        if let Some(layout) = &layout {
            if let Some(item) = layout.parse_row(line) {
                items.push(item);
            }
        }
    }

    items
}

/// Extracts line items from a text document, failing on zero items.
pub fn extract_from_text(text: &str, source: &str) -> ReconcileResult<Vec<LineItem>> {
    let items = parse_line_items(text);
    if items.is_empty() {
        return Err(ReconcileError::NoLineItems(source.to_string()));
    }
    Ok(items)
}

/// Extracts line items from a PDF document, failing on zero items.
pub fn extract_from_pdf(path: &Path) -> ReconcileResult<Vec<LineItem>> {
    let pages =
        pdf_extract::extract_text_by_pages(path).map_err(|e| ReconcileError::PdfUnreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    let mut items = Vec::new();
    for page in &pages {
        items.extend(parse_line_items(page));
    }
    if items.is_empty() {
        return Err(ReconcileError::NoLineItems(path.display().to_string()));
    }
    Ok(items)
}
