//! Terminal dashboard for simulated runs
//!
//! Renders the status indicator, the iteration progress bar, per-sample
//! lines and the energy/target series table.

use crate::notifications::{Notification, NotificationLevel};
use crate::simulator::{RunState, RunSummary, SimulationSample};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Status indicator text with its color
pub fn status_label(state: RunState) -> ColoredString {
    match state {
        RunState::Idle => state.label().dimmed(),
        RunState::Running => state.label().yellow().bold(),
        RunState::Converged => state.label().green().bold(),
    }
}

/// One-line readout: status, energy and iteration
pub fn summary_line(state: RunState, summary: Option<&RunSummary>) -> String {
    match summary {
        Some(summary) => format!(
            "[{}] energy {} | iteration {}",
            status_label(state),
            summary.energy_text(),
            summary.iteration_text()
        ),
        None => format!("[{}] energy - | iteration -", status_label(state)),
    }
}

/// Fixed-width series table, one row per sample
pub fn series_table(samples: &[SimulationSample]) -> String {
    let mut table = format!("{:>5}  {:>12}  {:>12}\n", "iter", "energy", "target");
    for sample in samples {
        table.push_str(&format!(
            "{:>5}  {:>12.6}  {:>12.6}\n",
            sample.iteration, sample.energy, sample.target
        ));
    }
    table
}

/// Display manager for the dashboard
pub struct DashboardView {
    iteration_bar: Option<ProgressBar>,
    show_progress: bool,
    show_samples: bool,
    update_interval: Duration,
}

impl DashboardView {
    pub fn new(show_progress: bool, show_samples: bool) -> Self {
        DashboardView {
            iteration_bar: None,
            show_progress,
            show_samples,
            update_interval: Duration::from_millis(100),
        }
    }

    /// Show banner with the run parameters
    pub fn show_banner(&self, target: f64, max_iterations: u32, interval: Duration) {
        if !self.show_progress {
            return;
        }

        let width = 64;
        println!("\n{}", "=".repeat(width).cyan());
        println!("{}", "  VQE Convergence Visualizer".bold().cyan());
        println!(
            "{}",
            format!(
                "  Target: {:.6} | Max iterations: {} | Tick: {}ms",
                target,
                max_iterations,
                interval.as_millis()
            )
            .dimmed()
        );
        println!("{}\n", "=".repeat(width).cyan());
    }

    /// Create the iteration bar for a new run
    pub fn start_run(&mut self, run_number: u32, max_iterations: u32) {
        self.finish_current();
        if !self.show_progress {
            return;
        }

        let pb = ProgressBar::new(max_iterations as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} Run {prefix} [{bar:40.cyan/blue}] {pos}/{len} | {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        pb.set_style(style);
        pb.set_prefix(run_number.to_string());
        pb.set_message(status_label(RunState::Running).to_string());
        pb.enable_steady_tick(self.update_interval);
        self.iteration_bar = Some(pb);
    }

    /// Advance the bar for a sample
    pub fn on_sample(&self, sample: &SimulationSample) {
        if let Some(pb) = &self.iteration_bar {
            pb.set_position(sample.iteration as u64);
            pb.set_message(format!("energy {:.6}", sample.energy));
            if self.show_samples {
                pb.println(format!(
                    "  {:>3}  energy {:>12.6}  target {:>10.6}  err {:.6}",
                    sample.iteration,
                    sample.energy,
                    sample.target,
                    (sample.energy - sample.target).abs()
                ));
            }
        }
    }

    /// Close the bar with the final readout
    pub fn finish_run(&mut self, summary: Option<&RunSummary>, reason: &str) {
        if let Some(pb) = self.iteration_bar.take() {
            pb.finish_and_clear();
        }
        if self.show_progress {
            println!(
                "{} {}",
                summary_line(RunState::Converged, summary),
                format!("({})", reason).dimmed()
            );
        }
    }

    /// Print a notification as a toast line
    pub fn show_notification(&self, notification: &Notification) {
        if !self.show_progress {
            return;
        }

        let tag = match notification.level {
            NotificationLevel::Info => notification.level.to_string().blue(),
            NotificationLevel::Success => notification.level.to_string().green(),
            NotificationLevel::Warning => notification.level.to_string().yellow(),
            NotificationLevel::Error => notification.level.to_string().red(),
        };
        let line = format!(
            "[{}] {} {}",
            tag,
            notification.message,
            notification.created_at.format("%H:%M:%S").to_string().dimmed()
        );
        match &self.iteration_bar {
            Some(pb) => pb.println(line),
            None => println!("{}", line),
        }
    }

    /// Print the series table
    pub fn show_series(&self, samples: &[SimulationSample]) {
        if self.show_samples {
            print!("{}", series_table(samples));
        }
    }

    pub fn finish_current(&mut self) {
        if let Some(pb) = self.iteration_bar.take() {
            pb.finish_and_clear();
        }
    }
}

impl Drop for DashboardView {
    fn drop(&mut self) {
        self.finish_current();
    }
}
