//! Threshold classifier (one instance per anomaly sensor).
//!
//! | Sensor      | Threshold (default) | Asserts   |
//! |-------------|---------------------|-----------|
//! | temperature | >= 50 °C            | `Fire`    |
//! | humidity    | >= 90 %RH           | `Leakage` |
//!
//! A write carries `{"threshold":<int>}`, the value the remote sensor
//! reports.  On success it becomes the classifier's current value and the
//! comparison result is pushed into the shared [`AnomalyState`].  On
//! failure nothing changes.

use log::{info, warn};

use crate::anomaly::{AnomalyCondition, AnomalyState};
use crate::error::RequestError;
use crate::field;

use super::{Reading, SensorKind};

/// Outcome of a successful update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub value: i32,
    pub asserted: bool,
    /// Previous condition, if this update changed it.
    pub changed_from: Option<AnomalyCondition>,
}

pub struct ThresholdClassifier {
    kind: SensorKind,
    owned: AnomalyCondition,
    threshold: i32,
    value: i32,
}

impl ThresholdClassifier {
    pub fn new(kind: SensorKind, owned: AnomalyCondition, threshold: i32, initial: i32) -> Self {
        Self {
            kind,
            owned,
            threshold,
            value: initial,
        }
    }

    /// Temperature classifier asserting `Fire`.
    pub fn temperature(threshold_c: i32, initial_c: i32) -> Self {
        Self::new(SensorKind::Temperature, AnomalyCondition::Fire, threshold_c, initial_c)
    }

    /// Humidity classifier asserting `Leakage`.
    pub fn humidity(threshold_rh: i32, initial_rh: i32) -> Self {
        Self::new(SensorKind::Humidity, AnomalyCondition::Leakage, threshold_rh, initial_rh)
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// The variant this classifier is allowed to assert.
    pub fn owned(&self) -> AnomalyCondition {
        self.owned
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    /// Whether `value` crosses this classifier's threshold.
    pub fn exceeds(&self, value: i32) -> bool {
        value >= self.threshold
    }

    /// Parse a write payload and classify it.
    pub fn update(
        &mut self,
        payload: &[u8],
        state: &mut AnomalyState,
    ) -> Result<Classification, RequestError> {
        if payload.is_empty() {
            warn!("{}: empty payload", self.kind.name());
            return Err(RequestError::MalformedRequest("empty payload"));
        }
        let text = core::str::from_utf8(payload)
            .map_err(|_| RequestError::MalformedRequest("payload is not UTF-8"))?;
        let value = field::get_i32(text, "threshold").map_err(|e| {
            warn!("{}: rejected payload '{}': {}", self.kind.name(), text, e);
            RequestError::from(e)
        })?;

        self.value = value;
        let asserted = self.exceeds(value);
        let changed_from = state.classify(self.owned, asserted);
        info!(
            "{}: value={} threshold={} asserted={} condition={}",
            self.kind.name(),
            value,
            self.threshold,
            asserted,
            state.condition().as_str()
        );

        Ok(Classification {
            value,
            asserted,
            changed_from,
        })
    }

    pub fn read(&self) -> Reading {
        Reading::new(self.kind, self.value)
    }
}
