//! Node configuration parameters
//!
//! All tunable parameters for the WasteNode. Values can be overridden via
//! NVS (non-volatile storage); defaults match the deployed smart-bin nodes.

use serde::{Deserialize, Serialize};

use crate::anomaly::PrecedencePolicy;
use crate::app::ports::ConfigError;
use crate::endpoints::EndpointId;

/// Which firmware role this node plays in the bin network.
///
/// The profile decides the device type announced to the coordinator and
/// the set of endpoints activated once registration is acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NodeProfile {
    /// Temperature + humidity classification with the anomaly lamp.
    AnomalyActuator,
    /// Fill-level sensing with the acknowledgement button.
    FullActuator,
    /// Reset button only.
    EmptyActuator,
    /// All endpoints on a single node.
    #[default]
    Combined,
}

impl NodeProfile {
    /// Device type string sent in the registration request.
    pub fn device_type(self) -> &'static str {
        match self {
            Self::AnomalyActuator => "anomaly-actuator",
            Self::FullActuator => "distance",
            Self::EmptyActuator => "empty-actuator",
            Self::Combined => "combined-actuator",
        }
    }

    /// Endpoints exposed by this profile.
    pub fn endpoints(self) -> &'static [EndpointId] {
        match self {
            Self::AnomalyActuator => &[
                EndpointId::Temperature,
                EndpointId::Humidity,
                EndpointId::Anomaly,
            ],
            Self::FullActuator => &[EndpointId::Distance, EndpointId::Button],
            Self::EmptyActuator => &[EndpointId::Button],
            Self::Combined => &[
                EndpointId::Temperature,
                EndpointId::Humidity,
                EndpointId::Distance,
                EndpointId::Anomaly,
                EndpointId::Button,
            ],
        }
    }
}

/// Core node configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    // --- Role ---
    pub profile: NodeProfile,

    // --- Registration ---
    /// Coordinator endpoint URI
    pub coordinator_uri: heapless::String<48>,
    /// Registration resource path on the coordinator
    pub registration_path: heapless::String<24>,
    /// First retry delay after a failed registration (milliseconds)
    pub registration_backoff_min_ms: u32,
    /// Upper bound on the retry delay (milliseconds)
    pub registration_backoff_max_ms: u32,

    // --- Thresholds ---
    /// Temperature at or above which Fire is asserted (°C)
    pub fire_threshold_c: i32,
    /// Humidity at or above which Leakage is asserted (%RH)
    pub leakage_threshold_rh: i32,
    /// Distance at or below which the bin counts as full (cm)
    pub bin_full_distance_cm: i32,

    // --- Simulated initial readings ---
    pub initial_temperature_c: i32,
    pub initial_humidity_rh: i32,
    pub initial_distance_cm: i32,

    // --- Policy ---
    /// Cross-classifier precedence on the anomaly condition
    pub precedence: PrecedencePolicy,
    /// Whether the reset button also clears the operator override
    pub reset_clears_override: bool,

    // --- Timing ---
    /// Actuator evaluation interval (milliseconds)
    pub actuator_tick_ms: u32,
    /// Telemetry report interval (seconds)
    pub telemetry_interval_secs: u32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        let mut coordinator_uri = heapless::String::new();
        let _ = coordinator_uri.push_str("coap://[fd00::1]:5683");
        let mut registration_path = heapless::String::new();
        let _ = registration_path.push_str("/registration");

        Self {
            profile: NodeProfile::Combined,

            // Registration
            coordinator_uri,
            registration_path,
            registration_backoff_min_ms: 1_000,
            registration_backoff_max_ms: 30_000,

            // Thresholds
            fire_threshold_c: 50,
            leakage_threshold_rh: 90,
            bin_full_distance_cm: 10,

            // Simulated readings
            initial_temperature_c: 45,
            initial_humidity_rh: 85,
            initial_distance_cm: 15,

            // Policy
            precedence: PrecedencePolicy::LastWriterWins,
            reset_clears_override: false,

            // Timing
            actuator_tick_ms: 100,       // 10 Hz
            telemetry_interval_secs: 60, // 1/min
        }
    }
}

impl NodeConfig {
    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.coordinator_uri.is_empty() {
            return Err(ConfigError::ValidationFailed("coordinator_uri must not be empty"));
        }
        if !self.registration_path.starts_with('/') {
            return Err(ConfigError::ValidationFailed(
                "registration_path must start with '/'",
            ));
        }
        if self.registration_backoff_min_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "registration_backoff_min_ms must be > 0",
            ));
        }
        if self.registration_backoff_max_ms < self.registration_backoff_min_ms {
            return Err(ConfigError::ValidationFailed(
                "registration_backoff_max_ms must be >= registration_backoff_min_ms",
            ));
        }
        if !(-40..=150).contains(&self.fire_threshold_c) {
            return Err(ConfigError::ValidationFailed("fire_threshold_c must be -40–150"));
        }
        if !(1..=100).contains(&self.leakage_threshold_rh) {
            return Err(ConfigError::ValidationFailed("leakage_threshold_rh must be 1–100"));
        }
        if !(1..=400).contains(&self.bin_full_distance_cm) {
            return Err(ConfigError::ValidationFailed("bin_full_distance_cm must be 1–400"));
        }
        if !(10..=5000).contains(&self.actuator_tick_ms) {
            return Err(ConfigError::ValidationFailed("actuator_tick_ms must be 10–5000"));
        }
        if self.telemetry_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed("telemetry_interval_secs must be > 0"));
        }
        Ok(())
    }
}
