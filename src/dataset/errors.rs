//! Dataset load errors
//!
//! Load errors are fatal at first use: the engine cannot serve any query
//! until the backing file is fixed. There is no fallback dataset and no
//! automatic retry.

use thiserror::Error;

/// Result type for dataset loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors raised while loading the sales dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot read sales file '{path}': {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in sales file: {0}")]
    MalformedCsv(#[from] csv::Error),

    #[error("Sales table is empty")]
    EmptyTable,

    #[error("Sales table missing mandatory columns: {0:?}")]
    MissingColumns(Vec<String>),
}
