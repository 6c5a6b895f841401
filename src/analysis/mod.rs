//! Stopping-condition analysis
//! Decides, per sample, whether a run has converged

pub mod convergence;
pub mod types;

pub use convergence::StopCriteria;
pub use types::{StopReason, TerminationCondition};
