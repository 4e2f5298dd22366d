//! Outbound application events.
//!
//! The [`NodeService`](super::service::NodeService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them: log to serial, forward to the coordinator,
//! count them in a test.

use crate::anomaly::{AnomalyCondition, OverrideState};
use crate::config::NodeProfile;
use crate::drivers::indicator::IndicatorPattern;
use crate::endpoints::EndpointId;
use crate::error::RequestError;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service started with this profile.
    Started(NodeProfile),

    /// The coordinator acknowledged registration after `attempts` tries.
    Registered { attempts: u32 },

    /// The profile's endpoints are now reachable.
    EndpointsActivated(&'static [EndpointId]),

    /// A classifier or the reset changed the anomaly condition.
    AnomalyChanged {
        from: AnomalyCondition,
        to: AnomalyCondition,
    },

    /// The operator override was set or cleared.
    OverrideChanged(OverrideState),

    /// The actuator switched to a different pattern.
    PatternChanged {
        from: IndicatorPattern,
        to: IndicatorPattern,
    },

    /// The bin-full flag flipped.
    BinLevelChanged { full: bool },

    /// The reset endpoint fired.
    ResetPressed { seq: u32, notified: usize },

    /// A request was answered with an error.
    RequestRejected {
        endpoint: Option<EndpointId>,
        error: RequestError,
    },

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time snapshot suitable for logging or transmission.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryData {
    pub condition: AnomalyCondition,
    pub override_state: OverrideState,
    pub pattern: IndicatorPattern,
    pub temperature_c: i32,
    pub humidity_rh: i32,
    pub distance_cm: i32,
    pub bin_full: bool,
    pub registered: bool,
    pub tick_count: u32,
}
