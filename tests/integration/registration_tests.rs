//! Registrar backoff schedule and per-profile payloads.

use wastenode::adapters::registration::{Registrar, RegistrationState};
use wastenode::config::{NodeConfig, NodeProfile};

use crate::mock_hw::MockCoordinator;

#[test]
fn backoff_doubles_and_caps() {
    let cfg = NodeConfig::default();
    let mut reg = Registrar::new(&cfg).unwrap();
    let mut coord = MockCoordinator::rejecting(u32::MAX);

    let mut now = 0u32;
    let mut delays = Vec::new();
    for _ in 0..8 {
        assert_eq!(reg.poll(now, &mut coord), None);
        let RegistrationState::Backoff { retry_at_ms, .. } = reg.state() else {
            panic!("expected backoff");
        };
        delays.push(retry_at_ms - now);
        now = retry_at_ms;
    }
    assert_eq!(
        delays,
        vec![1_000, 2_000, 4_000, 8_000, 16_000, 30_000, 30_000, 30_000]
    );
    assert_eq!(reg.attempts(), 8);
}

#[test]
fn device_type_follows_profile() {
    for (profile, ty) in [
        (NodeProfile::AnomalyActuator, "anomaly-actuator"),
        (NodeProfile::FullActuator, "distance"),
        (NodeProfile::EmptyActuator, "empty-actuator"),
    ] {
        let cfg = NodeConfig {
            profile,
            ..Default::default()
        };
        let reg = Registrar::new(&cfg).unwrap();
        assert_eq!(reg.payload(), format!(r#"{{"type":"{}"}}"#, ty));
    }
}

#[test]
fn survives_clock_wrap() {
    let cfg = NodeConfig::default();
    let mut reg = Registrar::new(&cfg).unwrap();
    let mut coord = MockCoordinator::rejecting(1);
    let start = u32::MAX - 500;
    assert_eq!(reg.poll(start, &mut coord), None);
    // retry_at wrapped to 499
    assert_eq!(reg.poll(u32::MAX, &mut coord), None);
    assert_eq!(reg.poll(499, &mut coord), Some(2));
}
