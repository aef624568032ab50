//! Result types for plan execution
//!
//! The result record is the only source of numeric truth for downstream
//! consumers; nothing after the engine recomputes or adjusts numbers.

use serde::Serialize;

use crate::plan::{GroupBy, Metric};

/// One group→value pair of a breakdown or top-N table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub group: String,
    pub value: f64,
}

/// Intent-specific payload of a successful execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultPayload {
    /// Zero rows matched the filters. A first-class success, not an error.
    NoMatch { value: f64, message: String },
    /// Scalar total for TOTAL_SALES / TOTAL_ACTIVE_STORES.
    Total { value: f64 },
    /// Ordered table for BREAKDOWN / TOP_N, sorted descending by value.
    Table { group_by: GroupBy, table: Vec<GroupRow> },
    /// Four-field comparison for COMPARE_YOY. `delta_pct` is None when the
    /// prior-year value is zero; never infinity, never an error.
    YearOverYear {
        current: f64,
        last_year: f64,
        delta: f64,
        delta_pct: Option<f64>,
    },
}

/// Outcome of executing one validated plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub ok: bool,
    /// Count of matched rows before aggregation.
    pub rows: usize,
    pub metric: Metric,
    #[serde(flatten)]
    pub payload: ResultPayload,
}

impl QueryResult {
    /// The empty-view result: `rows=0`, `value=0`, explanatory message.
    pub fn no_match(metric: Metric) -> Self {
        Self {
            ok: true,
            rows: 0,
            metric,
            payload: ResultPayload::NoMatch {
                value: 0.0,
                message: "No data matched the filters.".to_string(),
            },
        }
    }

    /// A scalar total.
    pub fn total(rows: usize, metric: Metric, value: f64) -> Self {
        Self {
            ok: true,
            rows,
            metric,
            payload: ResultPayload::Total { value },
        }
    }

    /// An ordered group table.
    pub fn table(rows: usize, metric: Metric, group_by: GroupBy, table: Vec<GroupRow>) -> Self {
        Self {
            ok: true,
            rows,
            metric,
            payload: ResultPayload::Table { group_by, table },
        }
    }

    /// A year-over-year comparison. Delta math lives here so every caller
    /// gets the same zero-division handling.
    pub fn year_over_year(rows: usize, metric: Metric, current: f64, last_year: f64) -> Self {
        let delta = current - last_year;
        let delta_pct = (last_year != 0.0).then(|| delta / last_year * 100.0);
        Self {
            ok: true,
            rows,
            metric,
            payload: ResultPayload::YearOverYear {
                current,
                last_year,
                delta,
                delta_pct,
            },
        }
    }

    /// Scalar value of the result: the total for totals, 0 for no-match.
    /// Returns None for table and comparison payloads.
    pub fn value(&self) -> Option<f64> {
        match &self.payload {
            ResultPayload::NoMatch { value, .. } | ResultPayload::Total { value } => Some(*value),
            _ => None,
        }
    }

    /// Returns true when zero rows matched.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_match_carries_zero_value() {
        let result = QueryResult::no_match(Metric::Sales);
        assert!(result.ok);
        assert!(result.is_empty());
        assert_eq!(result.value(), Some(0.0));
    }

    #[test]
    fn test_yoy_zero_division_is_explicit_absence() {
        let result = QueryResult::year_over_year(3, Metric::Sales, 100.0, 0.0);
        match result.payload {
            ResultPayload::YearOverYear {
                delta, delta_pct, ..
            } => {
                assert_eq!(delta, 100.0);
                assert_eq!(delta_pct, None);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_serialized_shape() {
        let result = QueryResult::total(2, Metric::ActiveStores, 4.0);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["rows"], 2);
        assert_eq!(json["metric"], "active_stores");
        assert_eq!(json["kind"], "total");
        assert_eq!(json["value"], 4.0);
    }
}
