//! Dataset subsystem
//!
//! Loads the sales table once at startup and exposes it as immutable shared
//! state: row storage, the load-time column mapping, and the CSV loader with
//! its time-key derivation rules.

mod errors;
mod loader;
mod mapping;
mod table;

pub use errors::{LoadError, LoadResult};
pub use loader::{load_dataset, load_from_reader};
pub use mapping::{ColumnMapping, Dimension};
pub use table::{Dataset, Row};
