//! Convergence detection for simulated runs
//! A run stops at the first iteration that hits the cap or lands within
//! tolerance of the target.

use crate::analysis::types::{StopReason, TerminationCondition};
use serde::{Deserialize, Serialize};

/// Default iteration cap
pub const DEFAULT_MAX_ITERATIONS: u32 = 20;

/// Default absolute tolerance around the target
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Stopping condition parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopCriteria {
    /// Convergence target
    pub target: f64,

    /// Hard cap on samples per run
    pub max_iterations: u32,

    /// Absolute distance to target that counts as converged
    pub tolerance: f64,
}

impl StopCriteria {
    /// Create criteria for a target with default cap and tolerance
    pub fn new(target: f64) -> Self {
        Self {
            target,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Evaluate the stopping condition for a freshly appended sample
    pub fn check(&self, iteration: u32, energy: f64) -> TerminationCondition {
        if self.is_within_tolerance(energy) {
            return TerminationCondition::Stop(StopReason::WithinTolerance);
        }

        if iteration >= self.max_iterations {
            return TerminationCondition::Stop(StopReason::IterationCap);
        }

        TerminationCondition::Continue
    }

    /// Absolute error of an energy against the target
    pub fn error(&self, energy: f64) -> f64 {
        (energy - self.target).abs()
    }

    /// Whether an energy is strictly within tolerance
    pub fn is_within_tolerance(&self, energy: f64) -> bool {
        self.error(energy) < self.tolerance
    }
}
