//! In-memory row-oriented dataset
//!
//! The dataset is loaded once and held as shared immutable state. Filtering
//! and aggregation build borrowed views over it; nothing mutates rows or the
//! column mapping after load.

use std::collections::HashMap;

use super::mapping::ColumnMapping;

/// One sales record with time keys derived at load time.
#[derive(Debug, Clone)]
pub struct Row {
    /// Normalized period key, `YYYY-MM`.
    pub period: String,
    /// Normalized year.
    pub year: i32,
    /// Normalized quarter key, `YYYY-Q#`.
    pub quarter: String,
    /// Sales value; unparseable cells are coerced to 0.0 at load time.
    pub sales: f64,
    /// Whitespace-trimmed store identifier.
    pub store_id: String,
    /// Raw cell per mapped dimension column, keyed by physical column name.
    attrs: HashMap<String, String>,
}

impl Row {
    /// Creates a row with the given derived keys and dimension cells.
    pub fn new(
        period: impl Into<String>,
        year: i32,
        quarter: impl Into<String>,
        sales: f64,
        store_id: impl Into<String>,
        attrs: HashMap<String, String>,
    ) -> Self {
        Self {
            period: period.into(),
            year,
            quarter: quarter.into(),
            sales,
            store_id: store_id.into(),
            attrs,
        }
    }

    /// Raw cell for a physical column, if the row carries it.
    pub fn attr(&self, column: &str) -> Option<&str> {
        self.attrs.get(column).map(String::as_str)
    }
}

/// The immutable tabular dataset plus its column mapping.
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Vec<Row>,
    mapping: ColumnMapping,
}

impl Dataset {
    /// Creates a dataset from already-normalized rows.
    pub fn new(rows: Vec<Row>, mapping: ColumnMapping) -> Self {
        Self { rows, mapping }
    }

    /// All rows, in load order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The column mapping resolved at load time.
    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// Number of rows retained after load-time normalization.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if no rows survived load-time normalization.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_row_attr_lookup() {
        let mut attrs = HashMap::new();
        attrs.insert("Brand".to_string(), "Acme".to_string());
        let row = Row::new("2024-01", 2024, "2024-Q1", 12.5, "S1", attrs);

        assert_eq!(row.attr("Brand"), Some("Acme"));
        assert_eq!(row.attr("Category"), None);
        assert_eq!(row.quarter, "2024-Q1");
    }

    #[test]
    fn test_empty_dataset_is_valid() {
        let mapping = ColumnMapping::new(Some("Value".into()), "Store", BTreeMap::new());
        let dataset = Dataset::new(Vec::new(), mapping);
        assert!(dataset.is_empty());
        assert_eq!(dataset.len(), 0);
    }
}
