//! vqesim - Simulated VQE convergence engine
//!
//! Drives the "VQE visualizer" panel of the hybrid quantum-classical
//! dashboard: a timer-driven run that decays toward a fixed target energy
//! with damped noise, under an `Idle / Running / Converged` state machine.
//!
//! # Architecture
//!
//! - **simulator**: state machine, energy model, run core, Tokio engine
//! - **analysis**: stopping condition
//! - **events / telemetry / notifications**: what the display consumes
//! - **cli / display / logging**: the terminal front end

pub mod errors;
pub mod analysis;
pub mod simulator;

// Re-export commonly used types
pub use errors::{SimError, Result};
pub use simulator::{ConvergenceSimulator, RunState, SimulationSample, SimulatorConfig};

pub mod events;
pub mod telemetry;
pub mod notifications;

pub mod cli;
pub mod display;
pub mod logging;
