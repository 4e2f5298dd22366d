//! ISR-debounced reset button.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up.  The GPIO fires on the falling
//! edge; the ISR stores the raw timestamp into an atomic and the main loop's
//! `tick()` turns edges into at most one [`ButtonEvent::Pressed`] per press.
//!
//! ## Debounce
//!
//! ```text
//!   Idle ──edge──▶ Settling ──50 ms──▶ (Pressed) Holdoff ──250 ms──▶ Idle
//!                    │ edge: bounce          │ edge: bounce
//!                    └────────┘              └────────┘
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

const DEBOUNCE_MS: u32 = 50;
/// Edges closer than this to an accepted press are contact bounce.
const REARM_MS: u32 = 250;

/// Raw ISR timestamp (milliseconds since boot, truncated to u32).
static BUTTON_ISR_TIMESTAMP: AtomicU32 = AtomicU32::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Pressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Idle,
    Settling { edge_ms: u32 },
    Holdoff { edge_ms: u32 },
}

pub struct ButtonDriver {
    state: DebounceState,
    last_isr_ms: u32,
    presses: u32,
}

impl Default for ButtonDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonDriver {
    pub fn new() -> Self {
        Self {
            state: DebounceState::Idle,
            last_isr_ms: 0,
            presses: 0,
        }
    }

    /// Accepted presses since boot.
    pub fn presses(&self) -> u32 {
        self.presses
    }

    /// Call from the main loop once per control tick.
    pub fn tick(&mut self, now_ms: u32) -> Option<ButtonEvent> {
        self.tick_with(BUTTON_ISR_TIMESTAMP.load(Ordering::Acquire), now_ms)
    }

    /// Debounce step against an explicit ISR timestamp.
    pub fn tick_with(&mut self, isr_ms: u32, now_ms: u32) -> Option<ButtonEvent> {
        let edge = isr_ms != 0 && isr_ms != self.last_isr_ms;
        if edge {
            self.last_isr_ms = isr_ms;
        }

        match self.state {
            DebounceState::Idle => {
                if edge {
                    self.state = DebounceState::Settling { edge_ms: isr_ms };
                }
                None
            }

            DebounceState::Settling { edge_ms } => {
                if now_ms.wrapping_sub(edge_ms) >= DEBOUNCE_MS {
                    self.state = DebounceState::Holdoff { edge_ms };
                    self.presses = self.presses.wrapping_add(1);
                    return Some(ButtonEvent::Pressed);
                }
                None
            }

            DebounceState::Holdoff { edge_ms } => {
                if edge && isr_ms.wrapping_sub(edge_ms) >= REARM_MS {
                    self.state = DebounceState::Settling { edge_ms: isr_ms };
                } else if now_ms.wrapping_sub(edge_ms) >= REARM_MS {
                    self.state = DebounceState::Idle;
                }
                None
            }
        }
    }
}

/// ISR handler for the button GPIO falling edge.  Lock-free.
pub fn button_isr_handler(now_ms: u32) {
    BUTTON_ISR_TIMESTAMP.store(now_ms, Ordering::Release);
}
