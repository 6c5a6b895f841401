//! Event bus from the simulator to the display
//!
//! Bounded mpsc channel; emission never blocks the tick path and drops the
//! event when the channel is full.

use crate::analysis::StopReason;
use crate::simulator::SimulationSample;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Channel capacity, comfortably above one run's sample count
pub const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Simulator lifecycle and sample events
#[derive(Debug, Clone, PartialEq)]
pub enum SimulatorEvent {
    RunStarted {
        run_id: Uuid,
        generation: u64,
    },
    SampleRecorded {
        generation: u64,
        sample: SimulationSample,
    },
    RunConverged {
        generation: u64,
        iterations: u32,
        final_energy: f64,
        reason: StopReason,
    },
    RunReset {
        generation: u64,
    },
}

impl SimulatorEvent {
    /// Generation the event belongs to
    pub fn generation(&self) -> u64 {
        match self {
            SimulatorEvent::RunStarted { generation, .. }
            | SimulatorEvent::SampleRecorded { generation, .. }
            | SimulatorEvent::RunConverged { generation, .. }
            | SimulatorEvent::RunReset { generation } => *generation,
        }
    }
}

/// Publisher side of the simulator event channel
#[derive(Clone)]
pub struct EventBus {
    sender: mpsc::Sender<SimulatorEvent>,
}

impl EventBus {
    /// Create new event bus with bounded channel
    pub fn new() -> (Self, mpsc::Receiver<SimulatorEvent>) {
        let (sender, receiver) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        (EventBus { sender }, receiver)
    }

    /// Emit an event without waiting
    pub fn emit(&self, event: SimulatorEvent) {
        if let Err(err) = self.sender.try_send(event) {
            tracing::debug!("dropping simulator event: {}", err);
        }
    }

    /// Whether the display side has gone away
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new().0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Duration};

    fn sample(iteration: u32) -> SimulationSample {
        SimulationSample {
            iteration,
            energy: -1.0,
            target: -1.137,
        }
    }

    #[tokio::test]
    async fn test_event_emission() {
        let (bus, mut receiver) = EventBus::new();
        bus.emit(SimulatorEvent::RunReset { generation: 3 });

        let event = timeout(Duration::from_millis(100), receiver.recv())
            .await
            .expect("Timeout waiting for event")
            .expect("Channel closed");

        assert_eq!(event, SimulatorEvent::RunReset { generation: 3 });
    }

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let (bus, mut receiver) = EventBus::new();
        for i in 1..=3 {
            bus.emit(SimulatorEvent::SampleRecorded {
                generation: 1,
                sample: sample(i),
            });
        }

        for i in 1..=3 {
            match receiver.recv().await.unwrap() {
                SimulatorEvent::SampleRecorded { sample, .. } => assert_eq!(sample.iteration, i),
                other => panic!("Wrong event type received: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_bounded_channel_drops_overflow() {
        let (bus, mut receiver) = EventBus::new();
        for i in 0..(EVENT_CHANNEL_CAPACITY as u64 + 50) {
            bus.emit(SimulatorEvent::RunReset { generation: i });
        }
        drop(bus);

        let mut received = 0;
        while receiver.recv().await.is_some() {
            received += 1;
        }
        assert_eq!(received, EVENT_CHANNEL_CAPACITY);
    }

    #[tokio::test]
    async fn test_closed_after_receiver_drop() {
        let (bus, receiver) = EventBus::new();
        assert!(!bus.is_closed());
        drop(receiver);
        assert!(bus.is_closed());
        bus.emit(SimulatorEvent::RunReset { generation: 1 });
    }

    #[test]
    fn test_event_generation() {
        let event = SimulatorEvent::RunConverged {
            generation: 9,
            iterations: 20,
            final_energy: -1.118597,
            reason: StopReason::IterationCap,
        };
        assert_eq!(event.generation(), 9);
    }
}
