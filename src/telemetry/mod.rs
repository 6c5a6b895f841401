//! Telemetry system for vqesim
//!
//! Collects simulator events and counters, and prints a session summary.

mod kpi;

pub use kpi::KpiDashboard;

use crate::analysis::StopReason;
use colored::Colorize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

/// Maximum number of events kept in the log; counters are unaffected
pub const MAX_TELEMETRY_EVENTS: usize = 1000;

/// Telemetry event types
#[derive(Debug, Clone)]
pub enum TelemetryEvent {
    RunStarted {
        generation: u64,
        timestamp: Instant,
    },
    SampleRecorded {
        generation: u64,
        iteration: u32,
        energy: f64,
        timestamp: Instant,
    },
    RunConverged {
        generation: u64,
        iterations: u32,
        final_error: f64,
        reason: StopReason,
        timestamp: Instant,
    },
    RunReset {
        generation: u64,
        timestamp: Instant,
    },
    StaleTickDiscarded {
        generation: u64,
        timestamp: Instant,
    },
}

/// Telemetry statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetryStats {
    pub runs_started: usize,
    pub samples_recorded: usize,
    pub runs_converged: usize,
    pub converged_by_cap: usize,
    pub converged_by_tolerance: usize,
    /// Sum of the final iteration over converged runs
    pub converged_iterations: usize,
    /// Sum of the final absolute error over converged runs
    pub total_final_error: f64,
    pub resets: usize,
    pub stale_ticks: usize,
}

/// Telemetry collector
#[derive(Clone)]
pub struct TelemetryCollector {
    events: Arc<Mutex<VecDeque<TelemetryEvent>>>,
    stats: Arc<Mutex<TelemetryStats>>,
    start_time: Instant,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl TelemetryCollector {
    /// Create a new telemetry collector
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_TELEMETRY_EVENTS))),
            stats: Arc::new(Mutex::new(TelemetryStats::default())),
            start_time: Instant::now(),
        }
    }

    /// Record an event
    pub fn record(&self, event: TelemetryEvent) {
        {
            let mut stats = lock(&self.stats);
            match &event {
                TelemetryEvent::RunStarted { .. } => stats.runs_started += 1,
                TelemetryEvent::SampleRecorded { .. } => stats.samples_recorded += 1,
                TelemetryEvent::RunConverged {
                    iterations,
                    final_error,
                    reason,
                    ..
                } => {
                    stats.runs_converged += 1;
                    stats.converged_iterations += *iterations as usize;
                    stats.total_final_error += final_error;
                    match reason {
                        StopReason::IterationCap => stats.converged_by_cap += 1,
                        StopReason::WithinTolerance => stats.converged_by_tolerance += 1,
                    }
                }
                TelemetryEvent::RunReset { .. } => stats.resets += 1,
                TelemetryEvent::StaleTickDiscarded { .. } => stats.stale_ticks += 1,
            }
        }

        let mut events = lock(&self.events);
        // Evict oldest if at capacity
        if events.len() >= MAX_TELEMETRY_EVENTS {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// Get current statistics
    pub fn get_stats(&self) -> TelemetryStats {
        lock(&self.stats).clone()
    }

    /// Get elapsed time since start
    pub fn elapsed(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    /// Events currently held in the log
    pub fn event_count(&self) -> usize {
        lock(&self.events).len()
    }

    /// Get recent events (last n)
    pub fn recent_events(&self, n: usize) -> Vec<TelemetryEvent> {
        let events = lock(&self.events);
        let start = events.len().saturating_sub(n);
        events.iter().skip(start).cloned().collect()
    }

    /// Mean final iteration over converged runs
    pub fn mean_iterations(&self) -> f64 {
        self.kpi_dashboard().mean_iterations
    }

    /// Aggregate KPIs over the session's converged runs
    pub fn kpi_dashboard(&self) -> KpiDashboard {
        KpiDashboard::from_stats(&lock(&self.stats))
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple telemetry display
pub struct TelemetryDisplay {
    collector: TelemetryCollector,
    verbosity: crate::cli::Verbosity,
}

impl TelemetryDisplay {
    pub fn new(collector: TelemetryCollector, verbosity: crate::cli::Verbosity) -> Self {
        Self {
            collector,
            verbosity,
        }
    }

    /// Display summary statistics
    pub fn display_summary(&self) {
        if !self.verbosity.show_progress() {
            return;
        }

        let stats = self.collector.get_stats();
        let elapsed = self.collector.elapsed();

        println!("\n{}", "Session Summary".bold().cyan());
        println!("─────────────────────────────────────");
        println!("Duration:          {:?}", elapsed);
        println!("Runs started:      {}", stats.runs_started);
        println!("Runs converged:    {}", stats.runs_converged);
        println!("  by cap:          {}", stats.converged_by_cap);
        println!("  by tolerance:    {}", stats.converged_by_tolerance);
        println!("Samples recorded:  {}", stats.samples_recorded);

        let kpi = self.collector.kpi_dashboard();
        if kpi.runs_converged > 0 {
            println!("Mean iterations:   {:.2}", kpi.mean_iterations);
            println!("Mean final error:  {:.6}", kpi.mean_final_error);
            println!(
                "Tolerance / cap:   {:.0}% / {:.0}%",
                kpi.tolerance_share * 100.0,
                kpi.cap_share * 100.0
            );
        }
        if self.verbosity.show_events() {
            println!("Resets:            {}", stats.resets);
            println!("Stale ticks:       {}", stats.stale_ticks);
        }
        println!();
    }

    /// Check if should show per-sample output
    pub fn should_show_details(&self) -> bool {
        self.verbosity.show_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_creation() {
        let collector = TelemetryCollector::new();
        assert_eq!(collector.event_count(), 0);
        assert_eq!(collector.get_stats(), TelemetryStats::default());
    }

    #[test]
    fn test_record_run_lifecycle() {
        let collector = TelemetryCollector::new();
        collector.record(TelemetryEvent::RunStarted {
            generation: 1,
            timestamp: Instant::now(),
        });
        for iteration in 1..=3 {
            collector.record(TelemetryEvent::SampleRecorded {
                generation: 1,
                iteration,
                energy: -1.0,
                timestamp: Instant::now(),
            });
        }
        collector.record(TelemetryEvent::RunConverged {
            generation: 1,
            iterations: 3,
            final_error: 0.005,
            reason: StopReason::WithinTolerance,
            timestamp: Instant::now(),
        });

        let stats = collector.get_stats();
        assert_eq!(stats.runs_started, 1);
        assert_eq!(stats.samples_recorded, 3);
        assert_eq!(stats.runs_converged, 1);
        assert_eq!(stats.converged_by_tolerance, 1);
        assert_eq!(stats.converged_by_cap, 0);
        assert_eq!(stats.converged_iterations, 3);
        assert!((collector.mean_iterations() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_cancelled_run_samples_do_not_inflate_mean() {
        let collector = TelemetryCollector::new();

        // Restarted after five samples, never converged
        collector.record(TelemetryEvent::RunStarted {
            generation: 1,
            timestamp: Instant::now(),
        });
        for iteration in 1..=5 {
            collector.record(TelemetryEvent::SampleRecorded {
                generation: 1,
                iteration,
                energy: -1.0,
                timestamp: Instant::now(),
            });
        }

        collector.record(TelemetryEvent::RunStarted {
            generation: 2,
            timestamp: Instant::now(),
        });
        for iteration in 1..=20 {
            collector.record(TelemetryEvent::SampleRecorded {
                generation: 2,
                iteration,
                energy: -1.1,
                timestamp: Instant::now(),
            });
        }
        collector.record(TelemetryEvent::RunConverged {
            generation: 2,
            iterations: 20,
            final_error: 0.0184,
            reason: StopReason::IterationCap,
            timestamp: Instant::now(),
        });

        assert_eq!(collector.get_stats().samples_recorded, 25);
        assert!((collector.mean_iterations() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_event_log_is_bounded() {
        let collector = TelemetryCollector::new();
        let total = MAX_TELEMETRY_EVENTS + 50;
        for generation in 0..total as u64 {
            collector.record(TelemetryEvent::StaleTickDiscarded {
                generation,
                timestamp: Instant::now(),
            });
        }

        assert_eq!(collector.event_count(), MAX_TELEMETRY_EVENTS);
        assert_eq!(collector.get_stats().stale_ticks, total);

        let recent = collector.recent_events(1);
        assert!(matches!(
            recent[0],
            TelemetryEvent::StaleTickDiscarded { generation, .. } if generation == total as u64 - 1
        ));
        let oldest = collector.recent_events(MAX_TELEMETRY_EVENTS);
        assert!(matches!(
            oldest[0],
            TelemetryEvent::StaleTickDiscarded { generation: 50, .. }
        ));
    }

    #[test]
    fn test_stale_and_reset_counters() {
        let collector = TelemetryCollector::new();
        collector.record(TelemetryEvent::StaleTickDiscarded {
            generation: 1,
            timestamp: Instant::now(),
        });
        collector.record(TelemetryEvent::RunReset {
            generation: 2,
            timestamp: Instant::now(),
        });

        let stats = collector.get_stats();
        assert_eq!(stats.stale_ticks, 1);
        assert_eq!(stats.resets, 1);
    }

    #[test]
    fn test_recent_events() {
        let collector = TelemetryCollector::new();
        for generation in 0..10 {
            collector.record(TelemetryEvent::RunStarted {
                generation,
                timestamp: Instant::now(),
            });
        }

        let recent = collector.recent_events(3);
        assert_eq!(recent.len(), 3);
        assert!(matches!(recent[0], TelemetryEvent::RunStarted { generation: 7, .. }));
    }

    #[test]
    fn test_mean_iterations_without_runs() {
        assert_eq!(TelemetryCollector::new().mean_iterations(), 0.0);
    }
}
