//! Reconciliation errors
//!
//! Extraction failures are fatal for the comparison request only; they never
//! affect the sales query engine.

use thiserror::Error;

/// Result type for reconciliation operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Errors raised while extracting, comparing, or reporting line items.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Cannot read PDF '{path}': {message}")]
    PdfUnreadable { path: String, message: String },

    #[error("No line items extracted from '{0}'")]
    NoLineItems(String),

    #[error("Cannot write report artifact: {0}")]
    ReportIo(#[from] std::io::Error),

    #[error("Cannot write tabular report: {0}")]
    ReportCsv(#[from] csv::Error),

    #[error("Cannot write structured report: {0}")]
    ReportJson(#[from] serde_json::Error),
}
