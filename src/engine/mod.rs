//! Query engine subsystem
//!
//! Plan execution flow, in strict order:
//!
//! 1. Validate the plan against the column mapping
//! 2. Filter the dataset conjunctively (dimensions, then time anchors)
//! 3. Aggregate the filtered view under the plan's intent and metric
//! 4. For COMPARE_YOY, re-enter filtering with a year-shifted derived plan
//! 5. Return the result record
//!
//! Every step is a pure, synchronous function of its inputs; an empty
//! filtered view is a successful result, never an error.

mod aggregate;
mod engine;
mod filters;
mod result;

pub use aggregate::Aggregator;
pub use engine::SalesEngine;
pub use filters::RowFilter;
pub use result::{GroupRow, QueryResult, ResultPayload};
