//! Plan validation and execution errors
//!
//! Validation failures are reported synchronously with a descriptive
//! message, never retried, and never partially executed.

use thiserror::Error;

use crate::dataset::Dimension;

/// Result type for plan validation and execution.
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors raised while validating or executing a query plan.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("metric must be 'sales' or 'active_stores'")]
    MissingMetric,

    #[error("group_by is required for BREAKDOWN and TOP_N")]
    MissingGroupBy,

    #[error(
        "COMPARE_YOY requires exactly one time filter: month OR months OR quarter OR year \
         ({0} populated)"
    )]
    AmbiguousTimeAnchor(usize),

    #[error("Sales column mapping not available")]
    MissingSalesColumn,

    #[error("Cannot group by '{0}' (no column mapping)")]
    UnmappedGroupBy(Dimension),

    #[error("limit must be between 1 and 50 (got {0})")]
    LimitOutOfRange(u32),

    #[error("Malformed time filter '{0}' (expected YYYY-MM or YYYY-Q#)")]
    InvalidTimeFilter(String),
}
