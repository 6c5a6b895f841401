//! Tokio-driven convergence simulator
//!
//! Wraps a [`Run`] behind one mutex and drives it with a single periodic
//! task per run. `start` cancels the previous task, bumps the generation and
//! arms a new task under the same lock, so at most one tick stream is live.
//! Ticks from a superseded generation are no-ops even if they race the abort.

use crate::analysis::StopCriteria;
use crate::errors::{SimError, Result};
use crate::events::{EventBus, SimulatorEvent};
use crate::simulator::model::{EnergyModel, NoiseSource, SimulationSample, UniformNoise};
use crate::simulator::run::{Run, SimulatorSnapshot, TickOutcome};
use crate::simulator::state::RunState;
use crate::simulator::summary::RunSummary;
use crate::telemetry::{TelemetryCollector, TelemetryEvent};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use uuid::Uuid;

/// Default tick period in milliseconds
pub const DEFAULT_INTERVAL_MS: u64 = 600;

/// Largest accepted iteration cap
pub const MAX_ITERATION_LIMIT: u32 = 10_000;

/// Simulator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub interval_ms: u64,
    pub target: f64,
    pub decay_constant: f64,
    pub noise_scale: f64,
    pub max_iterations: u32,
    pub tolerance: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        let model = EnergyModel::default();
        let criteria = StopCriteria::new(model.target);
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            target: model.target,
            decay_constant: model.decay_constant,
            noise_scale: model.noise_scale,
            max_iterations: criteria.max_iterations,
            tolerance: criteria.tolerance,
        }
    }
}

impl SimulatorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn energy_model(&self) -> EnergyModel {
        EnergyModel {
            target: self.target,
            decay_constant: self.decay_constant,
            noise_scale: self.noise_scale,
        }
    }

    pub fn stop_criteria(&self) -> StopCriteria {
        StopCriteria {
            target: self.target,
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.interval_ms == 0 {
            return Err(SimError::ConfigError(
                "interval_ms must be greater than 0".to_string(),
            ));
        }

        if self.max_iterations == 0 {
            return Err(SimError::ConfigError(
                "max_iterations must be greater than 0".to_string(),
            ));
        }

        if self.max_iterations > MAX_ITERATION_LIMIT {
            return Err(SimError::ConfigError(format!(
                "max_iterations must be at most {}",
                MAX_ITERATION_LIMIT
            )));
        }

        if !self.target.is_finite() {
            return Err(SimError::ConfigError("target must be finite".to_string()));
        }

        if !(self.tolerance > 0.0) {
            return Err(SimError::ConfigError(
                "tolerance must be greater than 0".to_string(),
            ));
        }

        if !(self.decay_constant > 0.0) {
            return Err(SimError::ConfigError(
                "decay_constant must be greater than 0".to_string(),
            ));
        }

        if !(self.noise_scale >= 0.0) {
            return Err(SimError::ConfigError(
                "noise_scale must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}

struct Shared {
    run: Run,
    noise: Box<dyn NoiseSource>,
    ticker: Option<JoinHandle<()>>,
}

/// Everything a tick task needs; cloned into each spawned task
#[derive(Clone)]
struct TickContext {
    shared: Arc<Mutex<Shared>>,
    state_tx: Arc<watch::Sender<RunState>>,
    events: Option<EventBus>,
    telemetry: Option<TelemetryCollector>,
}

impl TickContext {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, event: SimulatorEvent) {
        if let Some(bus) = &self.events {
            bus.emit(event);
        }
    }

    fn record(&self, event: TelemetryEvent) {
        if let Some(telemetry) = &self.telemetry {
            telemetry.record(event);
        }
    }

    fn apply_tick(&self, generation: u64) -> TickOutcome {
        let mut shared = self.lock();
        let Shared { run, noise, ticker } = &mut *shared;

        let outcome = match run.tick(generation, &mut **noise) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(generation, "tick failed: {}", err);
                return TickOutcome::Stale;
            }
        };

        match outcome {
            TickOutcome::Stale => {
                tracing::debug!(generation, current = run.generation(), "discarding stale tick");
                self.record(TelemetryEvent::StaleTickDiscarded {
                    generation,
                    timestamp: std::time::Instant::now(),
                });
            }
            TickOutcome::Sampled(sample) => {
                self.on_sample(generation, sample);
            }
            TickOutcome::Converged { sample, reason } => {
                self.on_sample(generation, sample);
                // The handle is ours: the generation matched.
                *ticker = None;
                self.state_tx.send_replace(RunState::Converged);
                tracing::info!(
                    generation,
                    iterations = sample.iteration,
                    energy = sample.energy,
                    "run converged: {}",
                    reason.describe()
                );
                self.emit(SimulatorEvent::RunConverged {
                    generation,
                    iterations: sample.iteration,
                    final_energy: sample.energy,
                    reason,
                });
                self.record(TelemetryEvent::RunConverged {
                    generation,
                    iterations: sample.iteration,
                    final_error: (sample.energy - sample.target).abs(),
                    reason,
                    timestamp: std::time::Instant::now(),
                });
            }
        }

        outcome
    }

    fn on_sample(&self, generation: u64, sample: SimulationSample) {
        tracing::debug!(generation, iteration = sample.iteration, energy = sample.energy, "sample");
        self.emit(SimulatorEvent::SampleRecorded { generation, sample });
        self.record(TelemetryEvent::SampleRecorded {
            generation,
            iteration: sample.iteration,
            energy: sample.energy,
            timestamp: std::time::Instant::now(),
        });
    }
}

async fn tick_loop(ctx: TickContext, generation: u64, first_tick: Instant, period: Duration) {
    let mut interval = time::interval_at(first_tick, period);
    loop {
        interval.tick().await;
        if ctx.apply_tick(generation).ends_stream() {
            break;
        }
    }
}

/// Simulated VQE convergence run with a timed sample stream
pub struct ConvergenceSimulator {
    config: SimulatorConfig,
    ctx: TickContext,
}

impl ConvergenceSimulator {
    /// Create an idle simulator with entropy-seeded noise
    pub fn new(config: SimulatorConfig) -> Self {
        let run = Run::new(config.energy_model(), config.stop_criteria());
        let (state_tx, _) = watch::channel(RunState::Idle);

        Self {
            config,
            ctx: TickContext {
                shared: Arc::new(Mutex::new(Shared {
                    run,
                    noise: Box::new(UniformNoise::from_entropy()),
                    ticker: None,
                })),
                state_tx: Arc::new(state_tx),
                events: None,
                telemetry: None,
            },
        }
    }

    /// Replace the noise source
    pub fn with_noise(self, noise: impl NoiseSource + 'static) -> Self {
        self.with_boxed_noise(Box::new(noise))
    }

    /// Replace the noise source with one built by a `NoiseRegistry`
    pub fn with_boxed_noise(self, noise: Box<dyn NoiseSource>) -> Self {
        self.ctx.lock().noise = noise;
        self
    }

    /// Publish events to a display collaborator; applies from the next `start`
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.ctx.events = Some(bus);
        self
    }

    /// Record telemetry; applies from the next `start`
    pub fn with_telemetry(mut self, telemetry: TelemetryCollector) -> Self {
        self.ctx.telemetry = Some(telemetry);
        self
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Begin a new run from any state
    ///
    /// Cancels the in-flight tick stream, clears the samples and arms a fresh
    /// periodic tick. Must be called from within a Tokio runtime.
    pub fn start(&self) {
        let mut shared = self.ctx.lock();

        if let Some(handle) = shared.ticker.take() {
            handle.abort();
        }

        let generation = match shared.run.start() {
            Ok(generation) => generation,
            Err(err) => {
                tracing::error!("failed to start run: {}", err);
                return;
            }
        };

        let run_id = Uuid::new_v4();
        self.ctx.state_tx.send_replace(RunState::Running);
        tracing::info!(%run_id, generation, "run started");
        self.ctx.emit(SimulatorEvent::RunStarted { run_id, generation });
        self.ctx.record(TelemetryEvent::RunStarted {
            generation,
            timestamp: std::time::Instant::now(),
        });

        let period = self.config.interval();
        shared.ticker = Some(tokio::spawn(tick_loop(
            self.ctx.clone(),
            generation,
            Instant::now() + period,
            period,
        )));
    }

    /// Cancel any run and return to `Idle`
    pub fn reset(&self) {
        let mut shared = self.ctx.lock();

        if let Some(handle) = shared.ticker.take() {
            handle.abort();
        }

        if let Err(err) = shared.run.reset() {
            tracing::error!("failed to reset run: {}", err);
            return;
        }

        let generation = shared.run.generation();
        self.ctx.state_tx.send_replace(RunState::Idle);
        tracing::info!(generation, "simulator reset");
        self.ctx.emit(SimulatorEvent::RunReset { generation });
        self.ctx.record(TelemetryEvent::RunReset {
            generation,
            timestamp: std::time::Instant::now(),
        });
    }

    pub fn state(&self) -> RunState {
        self.ctx.lock().run.state()
    }

    /// The execute control is disabled while this is true
    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    pub fn samples(&self) -> Vec<SimulationSample> {
        self.ctx.lock().run.samples().to_vec()
    }

    pub fn last_sample(&self) -> Option<SimulationSample> {
        self.ctx.lock().run.last_sample().copied()
    }

    pub fn snapshot(&self) -> SimulatorSnapshot {
        self.ctx.lock().run.snapshot()
    }

    pub fn summary(&self) -> Option<RunSummary> {
        let shared = self.ctx.lock();
        RunSummary::from_samples(
            shared.run.samples(),
            shared.run.criteria().max_iterations,
            shared.run.stop_reason(),
        )
    }

    /// Watch state changes
    pub fn subscribe_state(&self) -> watch::Receiver<RunState> {
        self.ctx.state_tx.subscribe()
    }

    /// Resolve once the state is `Converged`
    ///
    /// Never resolves for a simulator that is idle and never started.
    pub async fn wait_until_converged(&self) -> Result<()> {
        let mut receiver = self.subscribe_state();
        receiver
            .wait_for(|state| *state == RunState::Converged)
            .await
            .map_err(|_| SimError::ChannelClosed)?;
        Ok(())
    }
}

impl Default for ConvergenceSimulator {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}

impl Drop for ConvergenceSimulator {
    fn drop(&mut self) {
        if let Some(handle) = self.ctx.lock().ticker.take() {
            handle.abort();
        }
    }
}
