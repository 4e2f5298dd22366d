//! Anomaly lamp driver and actuator evaluation.
//!
//! Three discrete LEDs: red and yellow form the anomaly indicator, green
//! shows the bin-full flag.
//!
//! ## Pattern table
//!
//! | Pattern    | Red | Yellow | Meaning                          |
//! |------------|-----|--------|----------------------------------|
//! | `AllOff`   |  -  |   -    | no anomaly / override off        |
//! | `WarningA` |  ●  |   -    | Fire                             |
//! | `WarningB` |  -  |   ●    | Leakage                          |
//! | `SteadyOn` |  ●  |   ●    | override on                      |
//!
//! ## Evaluation order
//!
//! 1. Override enabled: `SteadyOn` or `AllOff` per `desired_on`.
//! 2. Otherwise the anomaly condition picks the pattern.
//!
//! The [`ActuatorDriver`] writes the pattern every tick; pins are
//! idempotent so repeated writes are harmless.

use embedded_hal::digital::OutputPin;
use log::{info, warn};

use crate::anomaly::{AnomalyCondition, AnomalyState};
use crate::app::ports::IndicatorPort;

/// What the anomaly lamp shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorPattern {
    #[default]
    AllOff,
    /// Fire: red.
    WarningA,
    /// Leakage: yellow.
    WarningB,
    /// Override on: red and yellow.
    SteadyOn,
}

impl IndicatorPattern {
    /// `(red, yellow)` lamp states.
    pub fn lamps(self) -> (bool, bool) {
        match self {
            Self::AllOff => (false, false),
            Self::WarningA => (true, false),
            Self::WarningB => (false, true),
            Self::SteadyOn => (true, true),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AllOff => "all_off",
            Self::WarningA => "warning_a",
            Self::WarningB => "warning_b",
            Self::SteadyOn => "steady_on",
        }
    }
}

// ── GPIO lamps ──────────────────────────────────────────────────

/// Three-LED indicator over `embedded-hal` output pins.
pub struct LedIndicator<R, Y, G> {
    red: R,
    yellow: Y,
    green: G,
}

impl<R, Y, G> LedIndicator<R, Y, G>
where
    R: OutputPin,
    Y: OutputPin,
    G: OutputPin,
{
    pub fn new(red: R, yellow: Y, green: G) -> Self {
        Self { red, yellow, green }
    }

    pub fn release(self) -> (R, Y, G) {
        (self.red, self.yellow, self.green)
    }
}

fn drive<P: OutputPin>(pin: &mut P, on: bool, name: &str) {
    let result = if on { pin.set_high() } else { pin.set_low() };
    if let Err(e) = result {
        warn!("indicator: {} pin write failed: {:?}", name, e);
    }
}

impl<R, Y, G> IndicatorPort for LedIndicator<R, Y, G>
where
    R: OutputPin,
    Y: OutputPin,
    G: OutputPin,
{
    fn show(&mut self, pattern: IndicatorPattern) {
        let (red, yellow) = pattern.lamps();
        drive(&mut self.red, red, "red");
        drive(&mut self.yellow, yellow, "yellow");
    }

    fn show_fill(&mut self, full: bool) {
        drive(&mut self.green, full, "green");
    }
}

// ── Actuator evaluation ─────────────────────────────────────────

/// Per-tick evaluator.  Holds only the last pattern for change logging.
#[derive(Debug, Default)]
pub struct ActuatorDriver {
    current: IndicatorPattern,
    ticks: u32,
}

impl ActuatorDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure mapping from state to pattern.
    pub fn evaluate(state: &AnomalyState) -> IndicatorPattern {
        let ovr = state.override_state();
        if ovr.enabled {
            return if ovr.desired_on {
                IndicatorPattern::SteadyOn
            } else {
                IndicatorPattern::AllOff
            };
        }
        match state.condition() {
            AnomalyCondition::Fire => IndicatorPattern::WarningA,
            AnomalyCondition::Leakage => IndicatorPattern::WarningB,
            AnomalyCondition::None => IndicatorPattern::AllOff,
        }
    }

    /// Evaluate and write both the anomaly pattern and the fill lamp.
    /// Returns the previous pattern if it changed.
    pub fn tick(
        &mut self,
        state: &AnomalyState,
        bin_full: bool,
        indicator: &mut impl IndicatorPort,
    ) -> Option<IndicatorPattern> {
        self.ticks = self.ticks.wrapping_add(1);
        let next = Self::evaluate(state);
        indicator.show(next);
        indicator.show_fill(bin_full);

        let prev = self.current;
        if prev == next {
            return None;
        }
        self.current = next;
        info!("indicator: {} -> {}", prev.as_str(), next.as_str());
        Some(prev)
    }

    /// Record a pattern driven outside the tick (reset).
    pub fn force(&mut self, pattern: IndicatorPattern) {
        self.current = pattern;
    }

    pub fn current(&self) -> IndicatorPattern {
        self.current
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }
}
