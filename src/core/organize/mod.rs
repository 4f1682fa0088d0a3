//! Photo copy planning and execution.
//!
//! Scans a source tree, resolves capture times with a bounded worker pool,
//! builds an immutable [`CopyPlan`] and copies it into the target tree.

mod executor;
mod planner;
mod types;
mod workers;

#[cfg(test)]
pub(crate) mod testing;

pub use executor::{CopyExecutor, CopyExecutorBuilder};
pub use planner::{derive_range, Planner, PlannerBuilder};
pub use types::*;
