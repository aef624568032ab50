//! Query plan subsystem
//!
//! Value objects describing one analytics request, plus the validator that
//! rejects malformed plans before they touch the dataset.

mod errors;
mod types;
mod validator;

pub use errors::{PlanError, PlanResult};
pub use types::{Filters, GroupBy, Intent, Metric, QueryPlan};
pub use validator::validate;
