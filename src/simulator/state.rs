//! Run state machine
//!
//! Three states, one per run lifecycle phase:
//! - `Idle`: initial, or entered by an explicit reset
//! - `Running`: samples accumulate on every tick
//! - `Converged`: terminal for a run, left again by `Start`

use crate::errors::{SimError, Result};
use serde::{Deserialize, Serialize};

/// Simulator run states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    /// No run in progress
    Idle,

    /// A run is in progress and ticking
    Running,

    /// The stopping condition fired (terminal per run)
    Converged,
}

/// Events that trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEvent {
    /// External start request, valid from any state
    Start,

    /// Tick appended a sample and the stopping condition did not fire
    Continue,

    /// Tick appended a sample and the stopping condition fired
    StopConditionMet,

    /// External reset request, valid from any state
    Reset,
}

impl RunState {
    /// Check if no more samples can be appended in this run
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Converged)
    }

    /// Attempt a state transition
    ///
    /// Valid transitions:
    ///
    /// ```text
    /// 1. *         → Running   (on: Start, clears history)
    /// 2. Running   → Running   (on: Continue)
    /// 3. Running   → Converged (on: StopConditionMet)
    /// 4. *         → Idle      (on: Reset)
    /// ```
    pub fn transition(&self, event: RunEvent) -> Result<RunState> {
        use RunEvent::*;
        use RunState::*;

        let next_state = match (self, event) {
            (_, Start) => Running,
            (_, Reset) => Idle,

            (Running, Continue) => Running,
            (Running, StopConditionMet) => Converged,

            (from, event) => {
                return Err(SimError::InvalidTransition {
                    from: format!("{:?}", from),
                    to: format!("(via {:?})", event),
                    reason: format!("No valid transition from {:?} on {:?}", from, event),
                });
            }
        };

        Ok(next_state)
    }

    /// Get all valid events from this state
    pub fn valid_events(&self) -> Vec<RunEvent> {
        use RunEvent::*;

        match self {
            RunState::Running => vec![Start, Continue, StopConditionMet, Reset],
            RunState::Idle | RunState::Converged => vec![Start, Reset],
        }
    }

    /// Status indicator label shown by the dashboard
    pub fn label(&self) -> &'static str {
        match self {
            RunState::Idle => "IDLE",
            RunState::Running => "EXECUTING",
            RunState::Converged => "CONVERGED",
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [RunState; 3] = [RunState::Idle, RunState::Running, RunState::Converged];

    #[test]
    fn test_valid_transitions() {
        assert_eq!(RunState::Idle.transition(RunEvent::Start).unwrap(), RunState::Running);
        assert_eq!(RunState::Running.transition(RunEvent::Continue).unwrap(), RunState::Running);
        assert_eq!(
            RunState::Running.transition(RunEvent::StopConditionMet).unwrap(),
            RunState::Converged
        );
        assert_eq!(RunState::Converged.transition(RunEvent::Start).unwrap(), RunState::Running);
        assert_eq!(RunState::Running.transition(RunEvent::Start).unwrap(), RunState::Running);
    }

    #[test]
    fn test_start_and_reset_from_any_state() {
        for state in ALL {
            assert_eq!(state.transition(RunEvent::Start).unwrap(), RunState::Running);
            assert_eq!(state.transition(RunEvent::Reset).unwrap(), RunState::Idle);
        }
    }

    #[test]
    fn test_ticks_outside_running_are_invalid() {
        for state in [RunState::Idle, RunState::Converged] {
            assert!(state.transition(RunEvent::Continue).is_err());
            assert!(state.transition(RunEvent::StopConditionMet).is_err());
        }
    }

    #[test]
    fn test_terminal_state() {
        assert!(RunState::Converged.is_terminal());
        assert!(!RunState::Idle.is_terminal());
        assert!(!RunState::Running.is_terminal());
    }

    #[test]
    fn test_valid_events_agree_with_transition() {
        for state in ALL {
            for event in state.valid_events() {
                assert!(state.transition(event).is_ok(), "{:?} on {:?}", state, event);
            }
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(RunState::Idle.label(), "IDLE");
        assert_eq!(RunState::Running.label(), "EXECUTING");
        assert_eq!(RunState::Converged.to_string(), "CONVERGED");
    }
}
