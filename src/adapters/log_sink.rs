//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production, stderr on the host).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | condition={} | override={}/{} | pattern={} | \
                     T={}\u{00b0}C RH={}% dist={}cm | bin={} | registered={} | ticks={}",
                    t.condition.as_str(),
                    if t.override_state.enabled { "on" } else { "off" },
                    t.override_state.desired_on,
                    t.pattern.as_str(),
                    t.temperature_c,
                    t.humidity_rh,
                    t.distance_cm,
                    if t.bin_full { "FULL" } else { "ok" },
                    t.registered,
                    t.tick_count,
                );
            }
            AppEvent::Started(profile) => {
                info!("START | profile={:?} type={}", profile, profile.device_type());
            }
            AppEvent::Registered { attempts } => {
                info!("REG | acknowledged after {} attempt(s)", attempts);
            }
            AppEvent::EndpointsActivated(ids) => {
                info!("REG | {} endpoint(s) active", ids.len());
            }
            AppEvent::AnomalyChanged { from, to } => {
                info!("ANOMALY | {} -> {}", from.as_str(), to.as_str());
            }
            AppEvent::OverrideChanged(o) => {
                info!("OVERRIDE | enabled={} desired_on={}", o.enabled, o.desired_on);
            }
            AppEvent::PatternChanged { from, to } => {
                info!("LAMP | {} -> {}", from.as_str(), to.as_str());
            }
            AppEvent::BinLevelChanged { full } => {
                info!("BIN | full={}", full);
            }
            AppEvent::ResetPressed { seq, notified } => {
                info!("RESET | seq={} notified={}", seq, notified);
            }
            AppEvent::RequestRejected { endpoint, error } => {
                let name = endpoint.map(|id| id.name()).unwrap_or("?");
                warn!("REQ | /{} rejected: {}", name, error);
            }
        }
    }
}
