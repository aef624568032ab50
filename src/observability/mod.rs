//! Observability subsystem
//!
//! Structured JSON logging only. Observability is read-only: no side effects
//! on execution, no async or background threads, deterministic output.

mod logger;

pub use logger::{Logger, Severity};
