//! NodeRuntime scheduling: registration gating, button, requests, timers.

use wastenode::anomaly::AnomalyCondition;
use wastenode::app::events::AppEvent;
use wastenode::config::NodeConfig;
use wastenode::drivers::indicator::IndicatorPattern;
use wastenode::endpoints::{ClientId, Request, ResponseCode};
use wastenode::runtime::NodeRuntime;

use crate::mock_hw::{MockCoordinator, MockIndicator, MockTransport, RecordingSink};

type Rt = NodeRuntime<MockIndicator, MockCoordinator, MockTransport, RecordingSink>;

fn runtime(coord: MockCoordinator) -> Rt {
    let mut rt = NodeRuntime::new(
        NodeConfig::default(),
        MockIndicator::new(),
        coord,
        MockTransport::new(),
        RecordingSink::new(),
    )
    .unwrap();
    rt.start(0);
    rt
}

#[test]
fn registers_on_first_step_then_serves_requests() {
    let mut rt = runtime(MockCoordinator::new());
    rt.transport_mut()
        .push(Request::put(ClientId(1), "/temperature", br#"{"threshold":55}"#).unwrap());
    rt.step_with(0, 0);

    assert!(rt.registrar().is_registered());
    let reg = &rt.coordinator().registrations[0];
    assert_eq!(reg.0, "coap://[fd00::1]:5683");
    assert_eq!(reg.1, "/registration");
    assert_eq!(reg.2, r#"{"type":"combined-actuator"}"#);

    // The request arrived in the same step as the acknowledgement, but the
    // endpoints only open when the ack event is drained.
    assert_eq!(rt.transport_mut().replies[0].1.code, ResponseCode::NotFound);

    rt.transport_mut()
        .push(Request::put(ClientId(1), "/temperature", br#"{"threshold":55}"#).unwrap());
    rt.step_with(100, 0);
    assert_eq!(rt.transport_mut().replies[1].1.code, ResponseCode::Changed);
    assert_eq!(rt.service().anomaly(), AnomalyCondition::Fire);
    assert_eq!(rt.indicator().pattern(), Some(IndicatorPattern::WarningA));
}

#[test]
fn retries_with_backoff_until_acknowledged() {
    let mut rt = runtime(MockCoordinator::rejecting(2));
    rt.step_with(0, 0); // attempt 1 fails, next at 1000
    rt.step_with(500, 0);
    rt.step_with(1_000, 0); // attempt 2 fails, next at 3000
    rt.step_with(2_900, 0);
    assert_eq!(rt.coordinator().registrations.len(), 2);
    assert!(!rt.registrar().is_registered());

    rt.step_with(3_000, 0); // attempt 3 succeeds
    assert!(rt.registrar().is_registered());
    assert!(rt.sink().events.contains(&AppEvent::Registered { attempts: 3 }));
}

#[test]
fn button_press_resets_condition() {
    let mut rt = runtime(MockCoordinator::new());
    rt.step_with(0, 0);
    rt.transport_mut()
        .push(Request::put(ClientId(1), "/humidity", br#"{"threshold":95}"#).unwrap());
    rt.step_with(100, 0);
    assert_eq!(rt.service().anomaly(), AnomalyCondition::Leakage);

    rt.step_with(200, 200); // edge seen, settling
    assert_eq!(rt.service().anomaly(), AnomalyCondition::Leakage);
    rt.step_with(300, 200); // debounced press
    assert_eq!(rt.service().anomaly(), AnomalyCondition::None);
    assert_eq!(rt.indicator().pattern(), Some(IndicatorPattern::AllOff));
    assert_eq!(
        rt.sink()
            .count(|e| matches!(e, AppEvent::ResetPressed { .. })),
        1
    );
}

#[test]
fn telemetry_emitted_on_interval() {
    let mut rt = runtime(MockCoordinator::new());
    let telemetry = |rt: &Rt| rt.sink().count(|e| matches!(e, AppEvent::Telemetry(_)));

    rt.step_with(0, 0);
    rt.step_with(59_900, 0);
    assert_eq!(telemetry(&rt), 0);
    rt.step_with(60_000, 0);
    assert_eq!(telemetry(&rt), 1);

    let Some(AppEvent::Telemetry(t)) = rt
        .sink()
        .events
        .iter()
        .rev()
        .find(|e| matches!(e, AppEvent::Telemetry(_)))
    else {
        panic!("no telemetry event");
    };
    assert!(t.registered);
    assert_eq!(t.temperature_c, 45);
    assert_eq!(t.humidity_rh, 85);
    assert_eq!(t.distance_cm, 15);
    assert!(!t.bin_full);
}

#[test]
fn actuator_evaluated_once_per_step() {
    let mut rt = runtime(MockCoordinator::new());
    // Millisecond truncation can make a nominal 100 ms gap read as 99 ms.
    let times = [0, 99, 200, 299, 400, 499, 600];
    for (i, t) in times.iter().enumerate() {
        rt.step_with(*t, 0);
        assert_eq!(rt.service().tick_count(), i as u32 + 1);
    }
    assert_eq!(rt.dropped_events(), 0);
}

#[test]
fn override_visible_on_the_step_it_arrives() {
    let mut rt = runtime(MockCoordinator::new());
    rt.step_with(0, 0);
    rt.transport_mut()
        .push(Request::put(ClientId(1), "/anomaly", br#"{"action":true}"#).unwrap());
    rt.step_with(40, 0);
    assert_eq!(rt.indicator().pattern(), Some(IndicatorPattern::SteadyOn));
}
