//! NodeService against mock adapters: routing, observe, reset and override.

use wastenode::anomaly::{AnomalyCondition, OverrideState};
use wastenode::app::events::AppEvent;
use wastenode::app::service::NodeService;
use wastenode::config::{NodeConfig, NodeProfile};
use wastenode::drivers::indicator::IndicatorPattern;
use wastenode::endpoints::observe::{MAX_OBSERVERS, ObserverId};
use wastenode::endpoints::{ClientId, EndpointId, Observe, Request, Response, ResponseCode};
use wastenode::error::RequestError;

use crate::mock_hw::{MockCoordinator, MockIndicator, RecordingSink};

struct Rig {
    svc: NodeService,
    lamp: MockIndicator,
    coord: MockCoordinator,
    sink: RecordingSink,
}

impl Rig {
    fn with(config: NodeConfig) -> Self {
        let mut rig = Self {
            svc: NodeService::new(config).unwrap(),
            lamp: MockIndicator::new(),
            coord: MockCoordinator::new(),
            sink: RecordingSink::new(),
        };
        rig.svc.start(&mut rig.lamp, &mut rig.sink);
        rig.svc.registered(1, &mut rig.sink);
        rig
    }

    fn new() -> Self {
        Self::with(NodeConfig::default())
    }

    fn send(&mut self, req: Request) -> Response {
        self.svc
            .handle_request(&req, &mut self.lamp, &mut self.coord, &mut self.sink)
    }

    fn put(&mut self, path: &str, body: &str) -> ResponseCode {
        self.send(Request::put(ClientId(1), path, body.as_bytes()).unwrap())
            .code
    }

    fn tick(&mut self) {
        self.svc.tick(&mut self.lamp, &mut self.sink);
    }
}

#[test]
fn endpoints_hidden_until_registered() {
    let mut svc = NodeService::new(NodeConfig::default()).unwrap();
    let (mut lamp, mut coord, mut sink) =
        (MockIndicator::new(), MockCoordinator::new(), RecordingSink::new());
    let req = Request::put(ClientId(1), "/temperature", br#"{"threshold":70}"#).unwrap();

    let resp = svc.handle_request(&req, &mut lamp, &mut coord, &mut sink);
    assert_eq!(resp.code, ResponseCode::NotFound);
    assert_eq!(svc.anomaly(), AnomalyCondition::None);

    svc.registered(3, &mut sink);
    let resp = svc.handle_request(&req, &mut lamp, &mut coord, &mut sink);
    assert_eq!(resp.code, ResponseCode::Changed);
    assert_eq!(svc.anomaly(), AnomalyCondition::Fire);
    assert!(sink.events.contains(&AppEvent::Registered { attempts: 3 }));
}

#[test]
fn profile_limits_exposed_endpoints() {
    let mut rig = Rig::with(NodeConfig {
        profile: NodeProfile::EmptyActuator,
        ..Default::default()
    });
    assert!(rig.svc.is_active(EndpointId::Button));
    assert!(!rig.svc.is_active(EndpointId::Temperature));
    assert_eq!(rig.put("/temperature", r#"{"threshold":70}"#), ResponseCode::NotFound);
    let resp = rig.send(Request::post(ClientId(1), "/button").unwrap());
    assert_eq!(resp.code, ResponseCode::Changed);
}

#[test]
fn malformed_object_rejected_whatever_the_key_order() {
    let mut rig = Rig::new();
    for body in [
        r#"{"threshold":55"#,
        r#"{"threshold":55 ]]]"#,
        r#"{"threshold":55,"x":{"y":1}}"#,
        r#"{"x":{"y":1},"threshold":55}"#,
    ] {
        assert_eq!(rig.put("/temperature", body), ResponseCode::BadRequest, "{body}");
    }
    assert_eq!(rig.svc.anomaly(), AnomalyCondition::None);
}

#[test]
fn readings_served_as_senml() {
    let mut rig = Rig::new();
    let resp = rig.send(Request::get(ClientId(1), "/temperature").unwrap());
    assert_eq!(resp.code, ResponseCode::Content);
    assert_eq!(resp.payload_str(), r#"{"e":[{"n":"temperature","v":45,"u":"Cel"}]}"#);

    assert_eq!(rig.put("/distance", r#"{"distance":7}"#), ResponseCode::Changed);
    let resp = rig.send(Request::get(ClientId(1), "/distance").unwrap());
    assert_eq!(resp.payload_str(), r#"{"e":[{"n":"distance","v":7,"u":"cm"}]}"#);
}

#[test]
fn malformed_payload_is_bad_request_and_logged() {
    let mut rig = Rig::new();
    assert_eq!(rig.put("/humidity", r#"{"humidity":99}"#), ResponseCode::BadRequest);
    assert_eq!(rig.svc.anomaly(), AnomalyCondition::None);
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            AppEvent::RequestRejected {
                endpoint: Some(EndpointId::Humidity),
                error: RequestError::MalformedRequest(_)
            }
        )),
        1
    );
}

#[test]
fn override_precedence_holds_through_classifier_updates() {
    let mut rig = Rig::new();
    assert_eq!(rig.put("/anomaly", r#"{"action":false}"#), ResponseCode::Changed);
    rig.tick();
    assert_eq!(rig.lamp.pattern(), Some(IndicatorPattern::AllOff));

    for body in [r#"{"threshold":80}"#, r#"{"threshold":20}"#, r#"{"threshold":55}"#] {
        rig.put("/temperature", body);
        rig.tick();
        assert_eq!(rig.lamp.pattern(), Some(IndicatorPattern::AllOff));
    }
    assert_eq!(rig.svc.anomaly(), AnomalyCondition::Fire);

    let resp = rig.send(Request::delete(ClientId(1), "/anomaly").unwrap());
    assert_eq!(resp.code, ResponseCode::Changed);
    assert_eq!(rig.svc.override_state(), OverrideState::default());
    rig.tick();
    assert_eq!(rig.lamp.pattern(), Some(IndicatorPattern::WarningA));
}

#[test]
fn observe_register_and_deregister() {
    let mut rig = Rig::new();
    let reg = Request::observe(ClientId(5), "/button", Observe::Register).unwrap();
    let resp = rig.send(reg);
    assert_eq!(resp.code, ResponseCode::Content);
    assert_eq!(resp.payload_str(), r#"{"seq":0}"#);
    assert_eq!(rig.svc.observer_count(), 1);

    rig.svc
        .press_reset(&mut rig.lamp, &mut rig.coord, &mut rig.sink);
    assert_eq!(rig.coord.notifications.len(), 1);
    assert_eq!(rig.coord.notifications[0].0, ObserverId(ClientId(5)));

    let dereg = Request::observe(ClientId(5), "/button", Observe::Deregister).unwrap();
    rig.send(dereg);
    rig.svc
        .press_reset(&mut rig.lamp, &mut rig.coord, &mut rig.sink);
    assert_eq!(rig.coord.notifications.len(), 1);
}

#[test]
fn observer_table_full_is_service_unavailable() {
    let mut rig = Rig::new();
    for c in 0..MAX_OBSERVERS as u16 {
        let req = Request::observe(ClientId(c), "/button", Observe::Register).unwrap();
        assert_eq!(rig.send(req).code, ResponseCode::Content);
    }
    let req = Request::observe(ClientId(100), "/button", Observe::Register).unwrap();
    assert_eq!(rig.send(req).code, ResponseCode::ServiceUnavailable);
}

#[test]
fn reset_is_idempotent_apart_from_notifications() {
    let mut rig = Rig::new();
    rig.send(Request::observe(ClientId(9), "/button", Observe::Register).unwrap());
    rig.put("/humidity", r#"{"threshold":97}"#);
    rig.tick();
    assert_eq!(rig.lamp.pattern(), Some(IndicatorPattern::WarningB));

    let first = rig
        .svc
        .press_reset(&mut rig.lamp, &mut rig.coord, &mut rig.sink);
    let second = rig
        .svc
        .press_reset(&mut rig.lamp, &mut rig.coord, &mut rig.sink);

    assert_eq!(first.cleared, Some(AnomalyCondition::Leakage));
    assert_eq!(second.cleared, None);
    assert_eq!(rig.svc.anomaly(), AnomalyCondition::None);
    assert_eq!(rig.lamp.pattern(), Some(IndicatorPattern::AllOff));
    assert_eq!(rig.svc.pattern(), IndicatorPattern::AllOff);
    assert_eq!(rig.coord.notifications.len(), 2);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::ResetPressed { .. })), 2);
}

#[test]
fn unreachable_observer_does_not_block_others() {
    let mut rig = Rig::new();
    rig.coord.unreachable.push(ClientId(1));
    rig.send(Request::observe(ClientId(1), "/button", Observe::Register).unwrap());
    rig.send(Request::observe(ClientId(2), "/button", Observe::Register).unwrap());
    let out = rig
        .svc
        .press_reset(&mut rig.lamp, &mut rig.coord, &mut rig.sink);
    assert_eq!((out.notified, out.failed), (1, 1));
}

#[test]
fn reset_can_be_configured_to_clear_override() {
    let mut rig = Rig::with(NodeConfig {
        reset_clears_override: true,
        ..Default::default()
    });
    rig.put("/anomaly", r#"{"action":true}"#);
    rig.svc
        .press_reset(&mut rig.lamp, &mut rig.coord, &mut rig.sink);
    assert!(!rig.svc.override_state().enabled);
    assert!(rig.sink.events.contains(&AppEvent::OverrideChanged(OverrideState::default())));
}

#[test]
fn bin_level_toggles_fill_lamp() {
    let mut rig = Rig::new();
    rig.put("/distance", r#"{"distance":4}"#);
    rig.tick();
    assert!(rig.svc.bin_full());
    assert_eq!(rig.lamp.fill(), Some(true));
    assert_eq!(rig.svc.anomaly(), AnomalyCondition::None);
    assert!(rig.sink.events.contains(&AppEvent::BinLevelChanged { full: true }));
}

#[test]
fn delete_on_sensor_is_method_not_allowed() {
    let mut rig = Rig::new();
    let resp = rig.send(Request::delete(ClientId(1), "/humidity").unwrap());
    assert_eq!(resp.code, ResponseCode::MethodNotAllowed);
}
