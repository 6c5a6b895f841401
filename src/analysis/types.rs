//! Analysis type definitions

use serde::{Deserialize, Serialize};

/// Which disjunct of the stopping condition fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopReason {
    /// Energy came within tolerance of the target
    WithinTolerance,

    /// Iteration cap reached
    IterationCap,
}

impl StopReason {
    /// Short human-readable description
    pub fn describe(&self) -> &'static str {
        match self {
            StopReason::WithinTolerance => "energy within tolerance",
            StopReason::IterationCap => "iteration cap reached",
        }
    }
}

/// Result of evaluating the stopping condition for one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationCondition {
    /// Keep ticking
    Continue,

    /// Stop the run
    Stop(StopReason),
}

impl TerminationCondition {
    /// Check if should terminate
    pub fn should_terminate(&self) -> bool {
        matches!(self, TerminationCondition::Stop(_))
    }

    /// Reason, when terminating
    pub fn reason(&self) -> Option<StopReason> {
        match self {
            TerminationCondition::Stop(reason) => Some(*reason),
            TerminationCondition::Continue => None,
        }
    }
}
