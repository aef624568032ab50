//! Engine facade: validate, filter, aggregate
//!
//! Execution is deterministic: same plan + same dataset = same result. The
//! dataset handle is injected at construction and shared read-only; nothing
//! in the execution path mutates it, so concurrent executions need no
//! locking.

use std::path::Path;
use std::sync::Arc;

use crate::dataset::{self, Dataset, LoadResult};
use crate::observability::Logger;
use crate::plan::{self, PlanResult, QueryPlan};

use super::aggregate::Aggregator;
use super::filters::RowFilter;
use super::result::QueryResult;

/// Executes validated query plans against an immutable dataset.
pub struct SalesEngine {
    dataset: Arc<Dataset>,
}

impl SalesEngine {
    /// Creates an engine over an already-loaded dataset.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    /// Loads the dataset from a CSV file and wraps it in an engine.
    pub fn from_csv(path: &Path) -> LoadResult<Self> {
        let dataset = dataset::load_dataset(path)?;
        Ok(Self::new(Arc::new(dataset)))
    }

    /// The shared dataset this engine executes against.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Runs one plan to completion: validate, filter, aggregate.
    ///
    /// Validation failures short-circuit before any row is touched. An empty
    /// filtered view is a successful result, not an error.
    pub fn execute(&self, plan: &QueryPlan) -> PlanResult<QueryResult> {
        plan::validate(plan, self.dataset.mapping()).inspect_err(|error| {
            Logger::warn("plan_rejected", &[("reason", &error.to_string())]);
        })?;

        let view = RowFilter::apply(self.dataset.rows(), self.dataset.mapping(), &plan.filters);
        let result = Aggregator::aggregate(&self.dataset, &view, plan)?;

        Logger::info(
            "plan_executed",
            &[
                ("intent", &format!("{:?}", plan.intent)),
                ("rows", &result.rows.to_string()),
            ],
        );
        Ok(result)
    }
}
