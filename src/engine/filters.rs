//! Row filtering for plan execution
//!
//! All populated filters are applied conjunctively (AND semantics).
//! Categorical dimension filters use case-insensitive, whitespace-trimmed
//! exact equality against the mapped column; a dimension with no mapped
//! column is skipped silently. Time filters match the derived period,
//! quarter, and year keys exactly.

use crate::dataset::{ColumnMapping, Dimension, Row};
use crate::plan::Filters;

/// Evaluates plan filters against dataset rows.
pub struct RowFilter;

impl RowFilter {
    /// Returns the rows satisfying every populated filter, in input order.
    pub fn apply<'a>(rows: &'a [Row], mapping: &ColumnMapping, filters: &Filters) -> Vec<&'a Row> {
        rows.iter()
            .filter(|row| Self::matches(row, mapping, filters))
            .collect()
    }

    /// Checks one row against every populated filter.
    pub fn matches(row: &Row, mapping: &ColumnMapping, filters: &Filters) -> bool {
        for dimension in Dimension::ALL {
            let Some(value) = filters.dimension(dimension) else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            // Absent mapping: the filter is a silent no-op, not an error.
            let Some(column) = mapping.dimension_column(dimension) else {
                continue;
            };
            let cell = row.attr(column).unwrap_or("");
            if !ci_eq(cell, value) {
                return false;
            }
        }

        if let Some(month) = filters.month.as_deref() {
            if !month.is_empty() && row.period != month {
                return false;
            }
        }

        if let Some(months) = filters.months.as_deref() {
            if !months.is_empty() {
                // Falsy/empty entries are dropped before matching.
                let hit = months
                    .iter()
                    .map(|m| m.trim())
                    .filter(|m| !m.is_empty())
                    .any(|m| row.period == m);
                if !hit {
                    return false;
                }
            }
        }

        if let Some(quarter) = filters.quarter.as_deref() {
            if !quarter.is_empty() && row.quarter != quarter {
                return false;
            }
        }

        if let Some(year) = filters.year {
            if row.year != year {
                return false;
            }
        }

        true
    }
}

/// Case-insensitive, whitespace-trimmed string equality.
///
/// Uses full Unicode lowercasing so non-ASCII dimension values
/// (city and brand names) match regardless of case.
fn ci_eq(cell: &str, value: &str) -> bool {
    cell.trim().to_lowercase() == value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    fn mapping() -> ColumnMapping {
        let mut dims = BTreeMap::new();
        dims.insert(Dimension::Brand, "Brand".to_string());
        ColumnMapping::new(Some("Value".to_string()), "Store", dims)
    }

    fn row(period: &str, year: i32, brand: &str) -> Row {
        let mut attrs = HashMap::new();
        attrs.insert("Brand".to_string(), brand.to_string());
        let quarter = format!("{year}-Q1");
        Row::new(period, year, quarter, 10.0, "S1", attrs)
    }

    #[test]
    fn test_dimension_filter_is_case_insensitive_and_trimmed() {
        let rows = vec![row("2024-01", 2024, "  Acme "), row("2024-01", 2024, "Other")];
        let filters = Filters {
            brand: Some("acme".to_string()),
            ..Filters::default()
        };

        let matched = RowFilter::apply(&rows, &mapping(), &filters);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].attr("Brand"), Some("  Acme "));
    }

    #[test]
    fn test_dimension_filter_matches_non_ascii_case_folds() {
        let rows = vec![row("2024-01", 2024, "MÜNCHEN"), row("2024-01", 2024, "Other")];
        let filters = Filters {
            brand: Some("münchen".to_string()),
            ..Filters::default()
        };

        let matched = RowFilter::apply(&rows, &mapping(), &filters);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].attr("Brand"), Some("MÜNCHEN"));
    }

    #[test]
    fn test_unmapped_dimension_filter_is_silently_skipped() {
        let rows = vec![row("2024-01", 2024, "Acme")];
        let filters = Filters {
            city: Some("Dubai".to_string()),
            ..Filters::default()
        };

        // City has no mapped column, so the filter must not exclude anything.
        let matched = RowFilter::apply(&rows, &mapping(), &filters);
        assert_eq!(matched.len(), 1);
    }

    #[test]
    fn test_time_filters_match_derived_keys() {
        let rows = vec![
            row("2024-01", 2024, "Acme"),
            row("2024-02", 2024, "Acme"),
            row("2023-01", 2023, "Acme"),
        ];

        let month = Filters {
            month: Some("2024-01".to_string()),
            ..Filters::default()
        };
        assert_eq!(RowFilter::apply(&rows, &mapping(), &month).len(), 1);

        let year = Filters {
            year: Some(2024),
            ..Filters::default()
        };
        assert_eq!(RowFilter::apply(&rows, &mapping(), &year).len(), 2);

        let quarter = Filters {
            quarter: Some("2023-Q1".to_string()),
            ..Filters::default()
        };
        assert_eq!(RowFilter::apply(&rows, &mapping(), &quarter).len(), 1);
    }

    #[test]
    fn test_months_membership_drops_empty_entries() {
        let rows = vec![
            row("2024-01", 2024, "Acme"),
            row("2024-02", 2024, "Acme"),
            row("2024-03", 2024, "Acme"),
        ];
        let filters = Filters {
            months: Some(vec![
                " 2024-01 ".to_string(),
                String::new(),
                "2024-03".to_string(),
            ]),
            ..Filters::default()
        };

        let matched = RowFilter::apply(&rows, &mapping(), &filters);
        let periods: Vec<&str> = matched.iter().map(|r| r.period.as_str()).collect();
        assert_eq!(periods, vec!["2024-01", "2024-03"]);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let rows = vec![
            row("2024-01", 2024, "Acme"),
            row("2024-01", 2024, "Other"),
            row("2023-01", 2023, "Acme"),
        ];
        let filters = Filters {
            brand: Some("Acme".to_string()),
            year: Some(2024),
            ..Filters::default()
        };

        let matched = RowFilter::apply(&rows, &mapping(), &filters);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].year, 2024);
    }

    #[test]
    fn test_empty_result_is_valid() {
        let rows = vec![row("2024-01", 2024, "Acme")];
        let filters = Filters {
            month: Some("1999-01".to_string()),
            ..Filters::default()
        };
        assert!(RowFilter::apply(&rows, &mapping(), &filters).is_empty());
    }
}
