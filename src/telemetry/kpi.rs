//! Session KPI dashboard aggregated over converged runs

use super::TelemetryStats;
use serde::Serialize;

/// Aggregate figures across every run that reached `Converged`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiDashboard {
    pub total_runs: usize,
    pub runs_converged: usize,
    pub mean_iterations: f64,
    pub mean_final_error: f64,
    /// Fraction of converged runs stopped by the tolerance band
    pub tolerance_share: f64,
    /// Fraction of converged runs stopped by the iteration cap
    pub cap_share: f64,
}

impl KpiDashboard {
    pub fn from_stats(stats: &TelemetryStats) -> Self {
        let converged = stats.runs_converged;
        let per_run = |total: f64| {
            if converged == 0 {
                0.0
            } else {
                total / converged as f64
            }
        };

        Self {
            total_runs: stats.runs_started,
            runs_converged: converged,
            mean_iterations: per_run(stats.converged_iterations as f64),
            mean_final_error: per_run(stats.total_final_error),
            tolerance_share: per_run(stats.converged_by_tolerance as f64),
            cap_share: per_run(stats.converged_by_cap as f64),
        }
    }

    /// Fraction of started runs that converged
    pub fn completion_rate(&self) -> f64 {
        if self.total_runs == 0 {
            0.0
        } else {
            self.runs_converged as f64 / self.total_runs as f64
        }
    }
}
