//! Aggregation over filtered views
//!
//! Computes intent-specific output from a filtered view. An empty view
//! short-circuits to the no-match result before any aggregation math runs.
//! COMPARE_YOY reuses the total logic twice: once over the current view, once
//! over a fresh filter pass of the full dataset with the time anchors shifted
//! back one year.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::dataset::{ColumnMapping, Dataset, Row};
use crate::plan::{GroupBy, Intent, Metric, PlanError, PlanResult, QueryPlan};

use super::filters::RowFilter;
use super::result::{GroupRow, QueryResult};

/// Default group count for TOP_N when the plan leaves `limit` unset.
const DEFAULT_TOP_N: usize = 5;

/// Computes intent-specific aggregates over filtered views.
pub struct Aggregator;

impl Aggregator {
    /// Aggregates a filtered view under the plan's intent and metric.
    ///
    /// `dataset` is the full, unfiltered dataset; it is only consulted by
    /// COMPARE_YOY to re-filter for the prior-year period.
    pub fn aggregate(
        dataset: &Dataset,
        view: &[&Row],
        plan: &QueryPlan,
    ) -> PlanResult<QueryResult> {
        let metric = plan.metric.ok_or(PlanError::MissingMetric)?;

        if view.is_empty() {
            return Ok(QueryResult::no_match(metric));
        }

        match plan.intent {
            Intent::TotalSales | Intent::TotalActiveStores => Ok(QueryResult::total(
                view.len(),
                metric,
                Self::total_value(view, metric),
            )),
            Intent::Breakdown => Self::grouped(view, plan, dataset.mapping(), metric, None),
            Intent::TopN => {
                let limit = plan.limit.map(|l| l as usize).unwrap_or(DEFAULT_TOP_N);
                Self::grouped(view, plan, dataset.mapping(), metric, Some(limit))
            }
            Intent::CompareYoy => Self::year_over_year(dataset, view, plan, metric),
        }
    }

    /// Scalar total for a view: sum of sales, or count of distinct store
    /// identifiers among rows with strictly positive sales.
    fn total_value(view: &[&Row], metric: Metric) -> f64 {
        match metric {
            Metric::Sales => view.iter().map(|row| row.sales).sum(),
            Metric::ActiveStores => {
                let stores: HashSet<&str> = view
                    .iter()
                    .filter(|row| row.sales > 0.0)
                    .map(|row| row.store_id.as_str())
                    .collect();
                stores.len() as f64
            }
        }
    }

    /// BREAKDOWN / TOP_N: group, aggregate per group, sort descending.
    fn grouped(
        view: &[&Row],
        plan: &QueryPlan,
        mapping: &ColumnMapping,
        metric: Metric,
        limit: Option<usize>,
    ) -> PlanResult<QueryResult> {
        let group_by = plan.group_by.ok_or(PlanError::MissingGroupBy)?;

        // Unlike dimension filters, an unmapped group-by column is a hard error.
        let column = match group_by {
            GroupBy::Month => None,
            GroupBy::Dimension(dimension) => Some(
                mapping
                    .dimension_column(dimension)
                    .ok_or(PlanError::UnmappedGroupBy(dimension))?,
            ),
        };
        let key_of = |row: &Row| -> String {
            match column {
                None => row.period.clone(),
                Some(col) => row.attr(col).unwrap_or("").to_string(),
            }
        };

        let mut table: Vec<GroupRow> = match metric {
            Metric::Sales => {
                let mut sums: HashMap<String, f64> = HashMap::new();
                for row in view {
                    *sums.entry(key_of(row)).or_insert(0.0) += row.sales;
                }
                sums.into_iter()
                    .map(|(group, value)| GroupRow { group, value })
                    .collect()
            }
            Metric::ActiveStores => {
                let mut stores: HashMap<String, HashSet<&str>> = HashMap::new();
                for row in view.iter().filter(|row| row.sales > 0.0) {
                    stores
                        .entry(key_of(row))
                        .or_default()
                        .insert(row.store_id.as_str());
                }
                stores
                    .into_iter()
                    .map(|(group, ids)| GroupRow {
                        group,
                        value: ids.len() as f64,
                    })
                    .collect()
            }
        };

        // Descending by value; ties broken by ascending label so output is
        // fully deterministic.
        table.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.group.cmp(&b.group))
        });
        if let Some(limit) = limit {
            table.truncate(limit);
        }

        Ok(QueryResult::table(view.len(), metric, group_by, table))
    }

    /// COMPARE_YOY: total over the current view, then total over a re-filter
    /// of the full dataset with a derived, year-shifted copy of the filters.
    fn year_over_year(
        dataset: &Dataset,
        view: &[&Row],
        plan: &QueryPlan,
        metric: Metric,
    ) -> PlanResult<QueryResult> {
        let current = Self::total_value(view, metric);

        let shifted = plan.filters.shifted_back_one_year()?;
        let prior_view = RowFilter::apply(dataset.rows(), dataset.mapping(), &shifted);
        let last_year = Self::total_value(&prior_view, metric);

        Ok(QueryResult::year_over_year(
            view.len(),
            metric,
            current,
            last_year,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dimension;
    use crate::engine::result::ResultPayload;
    use crate::plan::Filters;
    use std::collections::{BTreeMap, HashMap as StdHashMap};

    fn dataset(rows: Vec<Row>) -> Dataset {
        let mut dims = BTreeMap::new();
        dims.insert(Dimension::Brand, "Brand".to_string());
        let mapping = ColumnMapping::new(Some("Value".to_string()), "Store", dims);
        Dataset::new(rows, mapping)
    }

    fn row(period: &str, year: i32, sales: f64, store: &str, brand: &str) -> Row {
        let mut attrs = StdHashMap::new();
        attrs.insert("Brand".to_string(), brand.to_string());
        let month: u32 = period[5..].parse().unwrap();
        let quarter = format!("{year}-Q{}", (month - 1) / 3 + 1);
        Row::new(period, year, quarter, sales, store, attrs)
    }

    fn sample() -> Dataset {
        dataset(vec![
            row("2024-01", 2024, 100.0, "S1", "Acme"),
            row("2024-01", 2024, 0.0, "S2", "Acme"),
            row("2024-02", 2024, 40.0, "S2", "Other"),
            row("2023-01", 2023, 80.0, "S1", "Acme"),
        ])
    }

    fn plan(intent: Intent, metric: Metric) -> QueryPlan {
        let mut plan = QueryPlan::new(intent);
        plan.metric = Some(metric);
        plan
    }

    fn all_rows(dataset: &Dataset) -> Vec<&Row> {
        dataset.rows().iter().collect()
    }

    #[test]
    fn test_total_sales_sums_the_view() {
        let ds = sample();
        let result =
            Aggregator::aggregate(&ds, &all_rows(&ds), &plan(Intent::TotalSales, Metric::Sales))
                .unwrap();
        assert_eq!(result.rows, 4);
        assert_eq!(result.value(), Some(220.0));
    }

    #[test]
    fn test_active_stores_excludes_non_positive_sales() {
        let ds = dataset(vec![
            row("2024-01", 2024, 100.0, "S1", "Acme"),
            row("2024-01", 2024, 0.0, "S2", "Acme"),
            row("2024-01", 2024, -5.0, "S3", "Acme"),
        ]);
        let result = Aggregator::aggregate(
            &ds,
            &all_rows(&ds),
            &plan(Intent::TotalActiveStores, Metric::ActiveStores),
        )
        .unwrap();
        // S2 has zero sales and S3 negative sales; only S1 is active.
        assert_eq!(result.value(), Some(1.0));
    }

    #[test]
    fn test_breakdown_sorts_descending_with_stable_ties() {
        let ds = sample();
        let mut p = plan(Intent::Breakdown, Metric::Sales);
        p.group_by = Some(GroupBy::Dimension(Dimension::Brand));

        let result = Aggregator::aggregate(&ds, &all_rows(&ds), &p).unwrap();
        match result.payload {
            ResultPayload::Table { table, .. } => {
                let labels: Vec<&str> = table.iter().map(|r| r.group.as_str()).collect();
                assert_eq!(labels, vec!["Acme", "Other"]);
                assert_eq!(table[0].value, 180.0);
                assert_eq!(table[1].value, 40.0);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_group_by_month_uses_period_column() {
        let ds = sample();
        let mut p = plan(Intent::Breakdown, Metric::Sales);
        p.group_by = Some(GroupBy::Month);

        let result = Aggregator::aggregate(&ds, &all_rows(&ds), &p).unwrap();
        match result.payload {
            ResultPayload::Table { table, .. } => {
                assert_eq!(table[0].group, "2024-01");
                assert_eq!(table[0].value, 100.0);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_unmapped_group_by_is_a_hard_error() {
        let ds = sample();
        let mut p = plan(Intent::Breakdown, Metric::Sales);
        p.group_by = Some(GroupBy::Dimension(Dimension::City));

        let err = Aggregator::aggregate(&ds, &all_rows(&ds), &p).unwrap_err();
        assert_eq!(err, PlanError::UnmappedGroupBy(Dimension::City));
    }

    #[test]
    fn test_top_n_truncates_after_sort() {
        let ds = dataset(vec![
            row("2024-01", 2024, 10.0, "S1", "A"),
            row("2024-01", 2024, 30.0, "S2", "B"),
            row("2024-01", 2024, 20.0, "S3", "C"),
        ]);
        let mut p = plan(Intent::TopN, Metric::Sales);
        p.group_by = Some(GroupBy::Dimension(Dimension::Brand));
        p.limit = Some(2);

        let result = Aggregator::aggregate(&ds, &all_rows(&ds), &p).unwrap();
        match result.payload {
            ResultPayload::Table { table, .. } => {
                let labels: Vec<&str> = table.iter().map(|r| r.group.as_str()).collect();
                assert_eq!(labels, vec!["B", "C"]);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_empty_view_short_circuits() {
        let ds = sample();
        let result =
            Aggregator::aggregate(&ds, &[], &plan(Intent::CompareYoy, Metric::Sales)).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.value(), Some(0.0));
    }

    #[test]
    fn test_yoy_refilters_the_full_dataset() {
        let ds = sample();
        let mut p = plan(Intent::CompareYoy, Metric::Sales);
        p.filters = Filters {
            month: Some("2024-01".to_string()),
            ..Filters::default()
        };

        let view = RowFilter::apply(ds.rows(), ds.mapping(), &p.filters);
        let result = Aggregator::aggregate(&ds, &view, &p).unwrap();
        match result.payload {
            ResultPayload::YearOverYear {
                current,
                last_year,
                delta,
                delta_pct,
            } => {
                assert_eq!(current, 100.0);
                assert_eq!(last_year, 80.0);
                assert_eq!(delta, 20.0);
                assert_eq!(delta_pct, Some(25.0));
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }
}
