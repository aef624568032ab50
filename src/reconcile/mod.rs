//! Line-item reconciliation subsystem
//!
//! Independent of the query engine: each comparison request extracts line
//! items from two documents, outer-joins them on SKU, compares fields under
//! per-field tolerances, and writes deterministic report artifacts. No state
//! is shared between invocations.

mod compare;
mod errors;
mod extract;
mod line_item;
mod report;

pub use compare::{compare_items, Discrepancy, Issue, Summary, NUMERIC_TOLERANCE};
pub use errors::{ReconcileError, ReconcileResult};
pub use extract::{extract_from_pdf, extract_from_text, parse_line_items};
pub use line_item::LineItem;
pub use report::{compare_documents, write_reports, ReconcileOutcome};
