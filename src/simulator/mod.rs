//! Simulated convergence engine
//!
//! Core components: state machine, energy model, run core and the
//! timer-driven simulator.

pub mod engine;
pub mod model;
pub mod registry;
pub mod run;
pub mod state;
pub mod summary;

// Re-export commonly used types
pub use engine::{ConvergenceSimulator, SimulatorConfig};
pub use model::{EnergyModel, NoiseSource, ScriptedNoise, SimulationSample, UniformNoise, ZeroNoise};
pub use registry::{NoiseFactory, NoiseRegistry, DEFAULT_NOISE};
pub use run::{Run, SimulatorSnapshot, TickOutcome};
pub use state::{RunEvent, RunState};
pub use summary::RunSummary;
