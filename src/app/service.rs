//! Node service, the hexagonal core.
//!
//! [`NodeService`] owns the anomaly state, the classifiers, the endpoint
//! router and the observer table.  It exposes a hardware-agnostic API; all
//! I/O flows through port traits injected at call sites, so the whole
//! service is testable with mock adapters.
//!
//! ```text
//!  Request ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!              │          NodeService          │
//! Indicator ◀──│ Classifiers · Anomaly · Reset │──▶ ObserverPort
//!              └──────────────────────────────┘
//! ```

use log::{error, info};
use serde::Serialize;

use crate::anomaly::{AnomalyCondition, AnomalyState, OverrideState};
use crate::config::NodeConfig;
use crate::drivers::indicator::{ActuatorDriver, IndicatorPattern};
use crate::endpoints::observe::{ObserverId, ObserverRegistry};
use crate::endpoints::reset::{ResetEndpoint, ResetOutcome};
use crate::endpoints::{EndpointId, Method, Observe, Request, Response, ResponseCode, Router, override_ep};
use crate::error::RequestError;
use crate::sensors::Reading;
use crate::sensors::bin_level::BinLevelClassifier;
use crate::sensors::threshold::ThresholdClassifier;

use super::events::{AppEvent, TelemetryData};
use super::ports::{EventSink, IndicatorPort, ObserverPort};

/// Body of `GET /anomaly`.
#[derive(Serialize)]
struct AnomalyStatus {
    condition: &'static str,
    #[serde(rename = "override")]
    override_enabled: bool,
    desired_on: bool,
}

/// Body of a plain `GET /button` and of observe registrations.
#[derive(Serialize)]
struct ButtonStatus {
    seq: u32,
}

// ───────────────────────────────────────────────────────────────
// NodeService
// ───────────────────────────────────────────────────────────────

pub struct NodeService {
    config: NodeConfig,
    state: AnomalyState,
    temperature: ThresholdClassifier,
    humidity: ThresholdClassifier,
    bin: BinLevelClassifier,
    router: Router,
    observers: ObserverRegistry,
    reset: ResetEndpoint,
    actuator: ActuatorDriver,
    tick_count: u32,
}

impl NodeService {
    /// Construct the service from a validated configuration.
    ///
    /// No endpoint is reachable until [`registered`](Self::registered) runs.
    pub fn new(config: NodeConfig) -> crate::error::Result<Self> {
        config.validate()?;
        Ok(Self {
            state: AnomalyState::new(config.precedence),
            temperature: ThresholdClassifier::temperature(
                config.fire_threshold_c,
                config.initial_temperature_c,
            ),
            humidity: ThresholdClassifier::humidity(
                config.leakage_threshold_rh,
                config.initial_humidity_rh,
            ),
            bin: BinLevelClassifier::new(config.bin_full_distance_cm, config.initial_distance_cm),
            router: Router::new(),
            observers: ObserverRegistry::new(),
            reset: ResetEndpoint::new(),
            actuator: ActuatorDriver::new(),
            tick_count: 0,
            config,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, indicator: &mut impl IndicatorPort, sink: &mut impl EventSink) {
        indicator.show(IndicatorPattern::AllOff);
        indicator.show_fill(self.bin.is_full());
        sink.emit(&AppEvent::Started(self.config.profile));
        info!(
            "NodeService started as {} ({:?})",
            self.config.profile.device_type(),
            self.config.precedence
        );
    }

    /// The coordinator acknowledged us: expose the profile's endpoints.
    pub fn registered(&mut self, attempts: u32, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Registered { attempts });
        let endpoints = self.config.profile.endpoints();
        self.router.activate(endpoints);
        sink.emit(&AppEvent::EndpointsActivated(endpoints));
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// One actuator evaluation.
    pub fn tick(&mut self, indicator: &mut impl IndicatorPort, sink: &mut impl EventSink) {
        self.tick_count = self.tick_count.wrapping_add(1);
        if let Some(from) = self.actuator.tick(&self.state, self.bin.is_full(), indicator) {
            sink.emit(&AppEvent::PatternChanged {
                from,
                to: self.actuator.current(),
            });
        }
    }

    // ── Request handling ──────────────────────────────────────

    /// Answer one decoded request.  Never panics, never blocks.
    pub fn handle_request(
        &mut self,
        req: &Request,
        indicator: &mut impl IndicatorPort,
        notifier: &mut impl ObserverPort,
        sink: &mut impl EventSink,
    ) -> Response {
        let id = match self.router.resolve(&req.path) {
            Ok(id) => id,
            Err(e) => return Self::reject(None, e, sink),
        };

        let result = match (id, req.method) {
            (EndpointId::Temperature, Method::Get) => Ok(Self::reading(self.temperature.read())),
            (EndpointId::Humidity, Method::Get) => Ok(Self::reading(self.humidity.read())),
            (EndpointId::Distance, Method::Get) => Ok(Self::reading(self.bin.read())),
            (EndpointId::Temperature, Method::Put) => self.update_threshold(id, &req.payload, sink),
            (EndpointId::Humidity, Method::Put) => self.update_threshold(id, &req.payload, sink),
            (EndpointId::Distance, Method::Put) => self.update_distance(&req.payload, sink),
            (EndpointId::Anomaly, Method::Get) => Ok(self.anomaly_status()),
            (EndpointId::Anomaly, Method::Put) => self.set_override(&req.payload, sink),
            (EndpointId::Anomaly, Method::Delete) => Ok(self.clear_override(sink)),
            (EndpointId::Button, Method::Get) => self.observe(req),
            (EndpointId::Button, Method::Post) => {
                self.press_reset(indicator, notifier, sink);
                Ok(Response::changed())
            }
            _ => Err(RequestError::MethodNotAllowed),
        };

        result.unwrap_or_else(|e| Self::reject(Some(id), e, sink))
    }

    /// Physical button or `POST /button`.
    pub fn press_reset(
        &mut self,
        indicator: &mut impl IndicatorPort,
        notifier: &mut impl ObserverPort,
        sink: &mut impl EventSink,
    ) -> ResetOutcome {
        let before_override = self.state.override_state();
        let before_pattern = self.actuator.current();

        let outcome = self.reset.press(
            &mut self.state,
            self.config.reset_clears_override,
            indicator,
            &self.observers,
            notifier,
        );
        self.actuator.force(IndicatorPattern::AllOff);

        if let Some(from) = outcome.cleared {
            sink.emit(&AppEvent::AnomalyChanged {
                from,
                to: AnomalyCondition::None,
            });
        }
        if self.state.override_state() != before_override {
            sink.emit(&AppEvent::OverrideChanged(self.state.override_state()));
        }
        if before_pattern != IndicatorPattern::AllOff {
            sink.emit(&AppEvent::PatternChanged {
                from: before_pattern,
                to: IndicatorPattern::AllOff,
            });
        }
        sink.emit(&AppEvent::ResetPressed {
            seq: outcome.seq,
            notified: outcome.notified,
        });
        outcome
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn anomaly(&self) -> AnomalyCondition {
        self.state.condition()
    }

    pub fn override_state(&self) -> OverrideState {
        self.state.override_state()
    }

    pub fn bin_full(&self) -> bool {
        self.bin.is_full()
    }

    /// Pattern written on the last tick (or forced by reset).
    pub fn pattern(&self) -> IndicatorPattern {
        self.actuator.current()
    }

    pub fn is_active(&self, id: EndpointId) -> bool {
        self.router.is_active(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn tick_count(&self) -> u32 {
        self.tick_count
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn build_telemetry(&self, registered: bool) -> TelemetryData {
        TelemetryData {
            condition: self.state.condition(),
            override_state: self.state.override_state(),
            pattern: self.actuator.current(),
            temperature_c: self.temperature.value(),
            humidity_rh: self.humidity.value(),
            distance_cm: self.bin.distance_cm(),
            bin_full: self.bin.is_full(),
            registered,
            tick_count: self.tick_count,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn update_threshold(
        &mut self,
        id: EndpointId,
        payload: &[u8],
        sink: &mut impl EventSink,
    ) -> Result<Response, RequestError> {
        let classifier = if id == EndpointId::Temperature {
            &mut self.temperature
        } else {
            &mut self.humidity
        };
        let outcome = classifier.update(payload, &mut self.state)?;
        if let Some(from) = outcome.changed_from {
            sink.emit(&AppEvent::AnomalyChanged {
                from,
                to: self.state.condition(),
            });
        }
        Ok(Response::changed())
    }

    fn update_distance(
        &mut self,
        payload: &[u8],
        sink: &mut impl EventSink,
    ) -> Result<Response, RequestError> {
        if self.bin.update(payload)? {
            sink.emit(&AppEvent::BinLevelChanged {
                full: self.bin.is_full(),
            });
        }
        Ok(Response::changed())
    }

    fn set_override(
        &mut self,
        payload: &[u8],
        sink: &mut impl EventSink,
    ) -> Result<Response, RequestError> {
        let ovr = override_ep::set_override(payload, &mut self.state)?;
        sink.emit(&AppEvent::OverrideChanged(ovr));
        Ok(Response::changed())
    }

    fn clear_override(&mut self, sink: &mut impl EventSink) -> Response {
        let was_enabled = self.state.override_state().enabled;
        let ovr = override_ep::clear_override(&mut self.state);
        if was_enabled {
            sink.emit(&AppEvent::OverrideChanged(ovr));
        }
        Response::empty(ResponseCode::Changed)
    }

    fn observe(&mut self, req: &Request) -> Result<Response, RequestError> {
        let id = ObserverId(req.client);
        match req.observe {
            Some(Observe::Register) => {
                self.observers.register(id)?;
            }
            Some(Observe::Deregister) => {
                self.observers.deregister(id);
            }
            None => {}
        }
        Ok(Self::json(&ButtonStatus { seq: self.reset.seq() }))
    }

    fn anomaly_status(&self) -> Response {
        let ovr = self.state.override_state();
        Self::json(&AnomalyStatus {
            condition: self.state.condition().as_str(),
            override_enabled: ovr.enabled,
            desired_on: ovr.desired_on,
        })
    }

    fn reading(reading: Reading) -> Response {
        match reading.to_senml() {
            Ok(body) => Response::content(body.as_bytes()),
            Err(e) => {
                error!("{}: encode failed: {}", reading.name, e);
                Response::empty(ResponseCode::ServiceUnavailable)
            }
        }
    }

    fn json<T: Serialize>(value: &T) -> Response {
        match serde_json::to_vec(value) {
            Ok(body) => Response::content(&body),
            Err(e) => {
                error!("response encode failed: {}", e);
                Response::empty(ResponseCode::ServiceUnavailable)
            }
        }
    }

    fn reject(endpoint: Option<EndpointId>, error: RequestError, sink: &mut impl EventSink) -> Response {
        sink.emit(&AppEvent::RequestRejected { endpoint, error });
        Response::from(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::NotifyError;
    use crate::endpoints::ClientId;
    use crate::endpoints::observe::Notification;

    #[derive(Default)]
    struct Null;
    impl IndicatorPort for Null {
        fn show(&mut self, _: IndicatorPattern) {}
        fn show_fill(&mut self, _: bool) {}
    }
    impl ObserverPort for Null {
        fn notify(&mut self, _: ObserverId, _: &Notification) -> Result<(), NotifyError> {
            Ok(())
        }
    }
    impl EventSink for Null {
        fn emit(&mut self, _: &AppEvent) {}
    }

    fn online() -> NodeService {
        let mut svc = NodeService::new(NodeConfig::default()).unwrap();
        svc.registered(1, &mut Null);
        svc
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut cfg = NodeConfig::default();
        cfg.actuator_tick_ms = 0;
        assert!(NodeService::new(cfg).is_err());
    }

    #[test]
    fn get_anomaly_reports_state() {
        let mut svc = online();
        let (mut a, mut b, mut c) = (Null, Null, Null);
        let put = Request::put(ClientId(1), "/temperature", br#"{"threshold":60}"#).unwrap();
        svc.handle_request(&put, &mut a, &mut b, &mut c);
        let get = Request::get(ClientId(1), "/anomaly").unwrap();
        let resp = svc.handle_request(&get, &mut a, &mut b, &mut c);
        assert_eq!(resp.code, ResponseCode::Content);
        assert_eq!(
            resp.payload_str(),
            r#"{"condition":"fire","override":false,"desired_on":false}"#
        );
    }

    #[test]
    fn wrong_method_is_405() {
        let mut svc = online();
        let req = Request::post(ClientId(1), "/temperature").unwrap();
        let resp = svc.handle_request(&req, &mut Null, &mut Null, &mut Null);
        assert_eq!(resp.code, ResponseCode::MethodNotAllowed);
    }
}
