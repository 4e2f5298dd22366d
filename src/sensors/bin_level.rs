//! Ultrasonic fill-level sensor.
//!
//! The sensor measures the distance from the lid to the waste surface.
//! A distance at or below the configured threshold (10 cm by default)
//! means the bin is full.  The flag is independent of the anomaly state.

use log::{info, warn};

use crate::error::RequestError;
use crate::field;

use super::{Reading, SensorKind};

pub struct BinLevelClassifier {
    full_distance_cm: i32,
    distance_cm: i32,
    full: bool,
}

impl BinLevelClassifier {
    pub fn new(full_distance_cm: i32, initial_cm: i32) -> Self {
        Self {
            full_distance_cm,
            distance_cm: initial_cm,
            full: initial_cm <= full_distance_cm,
        }
    }

    /// Store a new distance and recompute the full flag.
    /// Returns `true` if the flag flipped.
    pub fn set_distance(&mut self, distance_cm: i32) -> bool {
        let was_full = self.full;
        self.distance_cm = distance_cm;
        self.full = distance_cm <= self.full_distance_cm;
        if self.full != was_full {
            info!(
                "distance: {}cm -> bin {}",
                distance_cm,
                if self.full { "FULL" } else { "not full" }
            );
        }
        self.full != was_full
    }

    /// Parse `{"distance":<int>}` and apply it.
    pub fn update(&mut self, payload: &[u8]) -> Result<bool, RequestError> {
        if payload.is_empty() {
            return Err(RequestError::MalformedRequest("empty payload"));
        }
        let text = core::str::from_utf8(payload)
            .map_err(|_| RequestError::MalformedRequest("payload is not UTF-8"))?;
        let distance = field::get_i32(text, "distance").map_err(|e| {
            warn!("distance: rejected payload '{}': {}", text, e);
            RequestError::from(e)
        })?;
        Ok(self.set_distance(distance))
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    pub fn distance_cm(&self) -> i32 {
        self.distance_cm
    }

    pub fn read(&self) -> Reading {
        Reading::new(SensorKind::Distance, self.distance_cm)
    }
}
