//! Reset button endpoint.
//!
//! One press (or `POST /button`) clears the anomaly condition, drives the
//! lamps dark and pushes a notification to every watcher.  Pressing again
//! changes nothing but the sequence number and the notifications.

use log::{info, warn};

use super::observe::{Notification, ObserverRegistry};
use crate::anomaly::{AnomalyCondition, AnomalyState};
use crate::app::ports::{IndicatorPort, ObserverPort};
use crate::drivers::indicator::IndicatorPattern;

/// What one press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetOutcome {
    pub seq: u32,
    /// Condition before the press, if it changed.
    pub cleared: Option<AnomalyCondition>,
    /// Notifications delivered.
    pub notified: usize,
    /// Notifications that failed.
    pub failed: usize,
}

#[derive(Debug, Default)]
pub struct ResetEndpoint {
    seq: u32,
}

impl ResetEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Presses handled so far.
    pub fn seq(&self) -> u32 {
        self.seq
    }

    pub fn press(
        &mut self,
        state: &mut AnomalyState,
        clears_override: bool,
        indicator: &mut impl IndicatorPort,
        observers: &ObserverRegistry,
        port: &mut impl ObserverPort,
    ) -> ResetOutcome {
        self.seq = self.seq.wrapping_add(1);
        let cleared = state.reset();
        if clears_override {
            state.clear_override();
        }
        indicator.show(IndicatorPattern::AllOff);

        let note = Notification {
            resource: "button",
            seq: self.seq,
        };
        let mut notified = 0;
        let mut failed = 0;
        for id in observers.iter() {
            match port.notify(id, &note) {
                Ok(()) => notified += 1,
                Err(e) => {
                    failed += 1;
                    warn!("reset: notify client {} failed: {}", id.0.0, e);
                }
            }
        }
        info!("reset: press #{} notified={} failed={}", self.seq, notified, failed);

        ResetOutcome {
            seq: self.seq,
            cleared,
            notified,
            failed,
        }
    }
}
