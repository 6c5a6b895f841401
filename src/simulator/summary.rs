//! Per-run summary for the dashboard's readout

use crate::analysis::StopReason;
use crate::simulator::model::SimulationSample;
use serde::{Deserialize, Serialize};

/// Figures derived from the current sample sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub iteration: u32,
    pub max_iterations: u32,
    pub energy: f64,
    pub minimum_energy: f64,
    pub target: f64,
    /// Why the run stopped; `None` while it is still running
    pub stop_reason: Option<StopReason>,
    /// Stopped inside the tolerance band rather than at the cap
    pub success: bool,
}

impl RunSummary {
    /// Summarize a sample sequence; `None` before the first sample
    pub fn from_samples(
        samples: &[SimulationSample],
        max_iterations: u32,
        stop_reason: Option<StopReason>,
    ) -> Option<Self> {
        let last = samples.last()?;
        let minimum_energy = samples
            .iter()
            .map(|s| s.energy)
            .fold(f64::INFINITY, f64::min);

        Some(Self {
            iteration: last.iteration,
            max_iterations,
            energy: last.energy,
            minimum_energy,
            target: last.target,
            stop_reason,
            success: stop_reason == Some(StopReason::WithinTolerance),
        })
    }

    /// Absolute error of the latest energy against the target
    pub fn error(&self) -> f64 {
        (self.energy - self.target).abs()
    }

    /// Latest energy, six decimals
    pub fn energy_text(&self) -> String {
        format!("{:.6}", self.energy)
    }

    /// Iteration readout, `n/max`
    pub fn iteration_text(&self) -> String {
        format!("{}/{}", self.iteration, self.max_iterations)
    }

    /// Whether the run has stopped
    pub fn is_finished(&self) -> bool {
        self.stop_reason.is_some()
    }

    /// Completion fraction in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.max_iterations == 0 {
            return 1.0;
        }
        (self.iteration as f64 / self.max_iterations as f64).min(1.0)
    }
}
