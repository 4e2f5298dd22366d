//! Sensor subsystem: per-sensor classifiers and their readings.
//!
//! Each classifier owns one scalar and its threshold.  Only the derived
//! [`AnomalyCondition`](crate::anomaly::AnomalyCondition) (or, for the
//! bin-level sensor, the full flag) leaves the classifier.
//!
//! Readings are served in the SenML-style shape the coordinator expects:
//!
//! ```text
//! {"e":[{"n":"temperature","v":45,"u":"Cel"}]}
//! ```

pub mod bin_level;
pub mod threshold;

use serde::Serialize;

/// The physical quantities this node measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Temperature,
    Humidity,
    Distance,
}

impl SensorKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Distance => "distance",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "Cel",
            Self::Humidity => "%RH",
            Self::Distance => "cm",
        }
    }
}

/// A point-in-time reading `{name, value, unit}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reading {
    #[serde(rename = "n")]
    pub name: &'static str,
    #[serde(rename = "v")]
    pub value: i32,
    #[serde(rename = "u")]
    pub unit: &'static str,
}

#[derive(Serialize)]
struct SenmlPack<'a> {
    e: [&'a Reading; 1],
}

impl Reading {
    pub fn new(kind: SensorKind, value: i32) -> Self {
        Self {
            name: kind.name(),
            value,
            unit: kind.unit(),
        }
    }

    /// Encode as a single-entry SenML pack.
    pub fn to_senml(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&SenmlPack { e: [self] })
    }
}
