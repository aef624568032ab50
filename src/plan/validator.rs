//! Plan validator
//!
//! A pure predicate over (plan, mapping) with no side effects. Fails fast
//! before any filtering or aggregation happens. Note the deliberate
//! asymmetry: only the sales column's presence is checked here; absent
//! dimension mappings are skipped silently by the filter engine but rejected
//! by the aggregation engine when used as a group-by key.

use crate::dataset::ColumnMapping;

use super::errors::{PlanError, PlanResult};
use super::types::{Intent, QueryPlan};

/// Bounds accepted for TOP_N limits.
const LIMIT_RANGE: std::ops::RangeInclusive<u32> = 1..=50;

/// Rejects structurally or semantically invalid plans before execution.
pub fn validate(plan: &QueryPlan, mapping: &ColumnMapping) -> PlanResult<()> {
    if plan.metric.is_none() {
        return Err(PlanError::MissingMetric);
    }

    match plan.intent {
        Intent::Breakdown | Intent::TopN => {
            if plan.group_by.is_none() {
                return Err(PlanError::MissingGroupBy);
            }
        }
        Intent::CompareYoy => {
            let anchors = plan.filters.time_anchor_count();
            if anchors != 1 {
                return Err(PlanError::AmbiguousTimeAnchor(anchors));
            }
        }
        Intent::TotalSales | Intent::TotalActiveStores => {}
    }

    if let Some(limit) = plan.limit {
        if !LIMIT_RANGE.contains(&limit) {
            return Err(PlanError::LimitOutOfRange(limit));
        }
    }

    // Dataset-level precondition, not a plan-level one.
    if mapping.sales_column().is_none() {
        return Err(PlanError::MissingSalesColumn);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dimension;
    use crate::plan::{Filters, GroupBy, Metric};
    use std::collections::BTreeMap;

    fn mapping() -> ColumnMapping {
        ColumnMapping::new(Some("Value".to_string()), "Store", BTreeMap::new())
    }

    fn sales_plan(intent: Intent) -> QueryPlan {
        let mut plan = QueryPlan::new(intent);
        plan.metric = Some(Metric::Sales);
        plan
    }

    #[test]
    fn test_metric_required() {
        let plan = QueryPlan::new(Intent::TotalSales);
        assert_eq!(validate(&plan, &mapping()), Err(PlanError::MissingMetric));
    }

    #[test]
    fn test_breakdown_requires_group_by() {
        let plan = sales_plan(Intent::Breakdown);
        assert_eq!(validate(&plan, &mapping()), Err(PlanError::MissingGroupBy));

        let mut plan = sales_plan(Intent::TopN);
        assert_eq!(validate(&plan, &mapping()), Err(PlanError::MissingGroupBy));

        plan.group_by = Some(GroupBy::Dimension(Dimension::Brand));
        assert_eq!(validate(&plan, &mapping()), Ok(()));
    }

    #[test]
    fn test_yoy_requires_exactly_one_time_anchor() {
        let mut plan = sales_plan(Intent::CompareYoy);
        assert_eq!(
            validate(&plan, &mapping()),
            Err(PlanError::AmbiguousTimeAnchor(0))
        );

        plan.filters = Filters {
            month: Some("2024-01".to_string()),
            year: Some(2024),
            ..Filters::default()
        };
        assert_eq!(
            validate(&plan, &mapping()),
            Err(PlanError::AmbiguousTimeAnchor(2))
        );

        plan.filters.year = None;
        assert_eq!(validate(&plan, &mapping()), Ok(()));
    }

    #[test]
    fn test_limit_bounds() {
        let mut plan = sales_plan(Intent::TopN);
        plan.group_by = Some(GroupBy::Month);

        plan.limit = Some(0);
        assert_eq!(validate(&plan, &mapping()), Err(PlanError::LimitOutOfRange(0)));

        plan.limit = Some(51);
        assert_eq!(validate(&plan, &mapping()), Err(PlanError::LimitOutOfRange(51)));

        plan.limit = Some(50);
        assert_eq!(validate(&plan, &mapping()), Ok(()));
    }

    #[test]
    fn test_missing_sales_column_is_a_dataset_precondition() {
        let mapping = ColumnMapping::new(None, "Store", BTreeMap::new());
        let plan = sales_plan(Intent::TotalSales);
        assert_eq!(validate(&plan, &mapping), Err(PlanError::MissingSalesColumn));
    }

    #[test]
    fn test_totals_need_no_group_by_or_anchor() {
        let plan = sales_plan(Intent::TotalActiveStores);
        assert_eq!(validate(&plan, &mapping()), Ok(()));
    }
}
