//! salescope - a strict, deterministic sales analytics and reconciliation engine
//!
//! Two independent pipelines:
//! - the query engine: validate a structured plan, filter the immutable
//!   dataset, aggregate the view (including year-over-year re-filtering)
//! - the reconciler: extract line items from two documents, diff them by
//!   SKU under per-field tolerances, and write report artifacts

pub mod dataset;
pub mod engine;
pub mod observability;
pub mod plan;
pub mod reconcile;
