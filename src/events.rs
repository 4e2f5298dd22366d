//! Control-loop event queue.
//!
//! Events are produced by:
//! - the button driver (debounced press)
//! - the scheduler tick (actuator evaluation, telemetry)
//! - the registration poller (coordinator acknowledgement)
//!
//! and consumed by [`NodeRuntime`](crate::runtime::NodeRuntime) in FIFO
//! order within the same step.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Button      │────▶│              │     │              │
//! │ Tick timer  │────▶│  EventQueue  │────▶│  Runtime     │
//! │ Registrar   │────▶│  (bounded)   │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use heapless::Deque;
use log::warn;

/// Maximum number of pending events.
pub const EVENT_QUEUE_CAP: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Debounced press of the reset button.
    ButtonPressed,
    /// Evaluate the actuator.
    ActuatorTick,
    /// Emit a telemetry snapshot.
    TelemetryTick,
    /// The coordinator acknowledged registration.
    RegistrationAcked,
}

/// Fixed-capacity FIFO owned by the runtime.
#[derive(Debug, Default)]
pub struct EventQueue {
    inner: Deque<Event, EVENT_QUEUE_CAP>,
    dropped: u32,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `event`.  Returns `false` (and counts a drop) when full.
    pub fn push(&mut self, event: Event) -> bool {
        if self.inner.push_back(event).is_err() {
            self.dropped = self.dropped.wrapping_add(1);
            warn!("events: queue full, dropped {:?}", event);
            return false;
        }
        true
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.inner.pop_front()
    }

    /// Pop every pending event into `handler`.  Returns how many ran.
    pub fn drain(&mut self, mut handler: impl FnMut(Event)) -> usize {
        let mut count = 0;
        while let Some(event) = self.pop() {
            handler(event);
            count += 1;
        }
        count
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Events lost to a full queue since boot.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}
