//! Timer-free run core
//!
//! Holds the state, the sample sequence and the generation counter. Every
//! `start`/`reset` bumps the generation; a tick carries the generation it
//! was armed under and is discarded when that no longer matches.

use crate::analysis::{StopCriteria, StopReason};
use crate::errors::Result;
use crate::simulator::model::{EnergyModel, NoiseSource, SimulationSample};
use crate::simulator::state::{RunEvent, RunState};
use serde::{Deserialize, Serialize};

/// Outcome of applying one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Tick belonged to an old generation or arrived outside `Running`
    Stale,

    /// Sample appended, run continues
    Sampled(SimulationSample),

    /// Sample appended and the run converged
    Converged {
        sample: SimulationSample,
        reason: StopReason,
    },
}

impl TickOutcome {
    /// Whether the tick stream that produced this outcome should stop
    pub fn ends_stream(&self) -> bool {
        !matches!(self, TickOutcome::Sampled(_))
    }
}

/// Consistent read of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorSnapshot {
    pub generation: u64,
    pub state: RunState,
    pub samples: Vec<SimulationSample>,
    pub stop_reason: Option<StopReason>,
}

/// One simulator's run state
#[derive(Debug, Clone)]
pub struct Run {
    model: EnergyModel,
    criteria: StopCriteria,
    state: RunState,
    samples: Vec<SimulationSample>,
    iteration: u32,
    generation: u64,
    stop_reason: Option<StopReason>,
}

impl Run {
    /// Create an idle run
    pub fn new(model: EnergyModel, criteria: StopCriteria) -> Self {
        Self {
            model,
            criteria,
            state: RunState::Idle,
            samples: Vec::new(),
            iteration: 0,
            generation: 0,
            stop_reason: None,
        }
    }

    /// Begin a new run, discarding the previous one
    ///
    /// Returns the generation that ticks for this run must carry.
    pub fn start(&mut self) -> Result<u64> {
        self.state = self.state.transition(RunEvent::Start)?;
        self.clear();
        Ok(self.generation)
    }

    /// Return to `Idle`, discarding the current run
    pub fn reset(&mut self) -> Result<()> {
        self.state = self.state.transition(RunEvent::Reset)?;
        self.clear();
        Ok(())
    }

    fn clear(&mut self) {
        self.generation += 1;
        self.samples.clear();
        self.iteration = 0;
        self.stop_reason = None;
    }

    /// Apply one tick armed under `generation`
    pub fn tick(&mut self, generation: u64, noise: &mut dyn NoiseSource) -> Result<TickOutcome> {
        if generation != self.generation || self.state != RunState::Running {
            return Ok(TickOutcome::Stale);
        }

        let next = self.iteration + 1;
        let sample = self.model.sample(next, noise.draw());
        self.iteration = next;
        self.samples.push(sample);

        let termination = self.criteria.check(next, sample.energy);
        match termination.reason() {
            Some(reason) => {
                self.state = self.state.transition(RunEvent::StopConditionMet)?;
                self.stop_reason = Some(reason);
                Ok(TickOutcome::Converged { sample, reason })
            }
            None => {
                self.state = self.state.transition(RunEvent::Continue)?;
                Ok(TickOutcome::Sampled(sample))
            }
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn samples(&self) -> &[SimulationSample] {
        &self.samples
    }

    pub fn last_sample(&self) -> Option<&SimulationSample> {
        self.samples.last()
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    pub fn criteria(&self) -> &StopCriteria {
        &self.criteria
    }

    pub fn model(&self) -> &EnergyModel {
        &self.model
    }

    pub fn snapshot(&self) -> SimulatorSnapshot {
        SimulatorSnapshot {
            generation: self.generation,
            state: self.state,
            samples: self.samples.clone(),
            stop_reason: self.stop_reason,
        }
    }
}
