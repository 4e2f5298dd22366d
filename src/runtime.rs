//! Cooperative run-to-completion loop.
//!
//! [`NodeRuntime`] owns the [`NodeService`] plus every adapter it talks to
//! and advances the whole node by one scheduling tick per
//! [`step`](NodeRuntime::step):
//!
//! ```text
//!  1. registration poll      (until acknowledged, then expose endpoints)
//!  2. button debounce        → ButtonPressed
//!  3. pending requests       → responses
//!  4. actuator evaluation    → ActuatorTick (every step)
//!     telemetry timer        → TelemetryTick
//!  5. drain event queue
//! ```
//!
//! Nothing in a step blocks; the caller decides how long to sleep between
//! steps (normally `actuator_tick_ms`).

use log::info;

use crate::adapters::registration::Registrar;
use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, IndicatorPort, ObserverPort, RegistrationPort, RequestSource, ResponseSink};
use crate::app::service::NodeService;
use crate::config::NodeConfig;
use crate::drivers::button::{ButtonDriver, ButtonEvent};
use crate::endpoints::channels::REQUEST_DEPTH;
use crate::events::{Event, EventQueue};

pub struct NodeRuntime<I, C, T, S> {
    service: NodeService,
    registrar: Registrar,
    button: ButtonDriver,
    events: EventQueue,
    indicator: I,
    coordinator: C,
    transport: T,
    sink: S,
    telemetry_ms: u32,
    last_telemetry_ms: u32,
}

impl<I, C, T, S> NodeRuntime<I, C, T, S>
where
    I: IndicatorPort,
    C: RegistrationPort + ObserverPort,
    T: RequestSource + ResponseSink,
    S: EventSink,
{
    pub fn new(
        config: NodeConfig,
        indicator: I,
        coordinator: C,
        transport: T,
        sink: S,
    ) -> crate::error::Result<Self> {
        let registrar = Registrar::new(&config)?;
        let telemetry_ms = config.telemetry_interval_secs.saturating_mul(1_000);
        let service = NodeService::new(config)?;
        Ok(Self {
            service,
            registrar,
            button: ButtonDriver::new(),
            events: EventQueue::new(),
            indicator,
            coordinator,
            transport,
            sink,
            telemetry_ms,
            last_telemetry_ms: 0,
        })
    }

    /// Drive the lamps to a known state and announce the profile.
    pub fn start(&mut self, now_ms: u32) {
        self.last_telemetry_ms = now_ms;
        self.service.start(&mut self.indicator, &mut self.sink);
    }

    /// One scheduling tick using the button ISR timestamp.
    pub fn step(&mut self, now_ms: u32) -> usize {
        let pressed = self.button.tick(now_ms);
        self.step_inner(now_ms, pressed)
    }

    /// One scheduling tick against an explicit ISR timestamp.
    pub fn step_with(&mut self, now_ms: u32, isr_ms: u32) -> usize {
        let pressed = self.button.tick_with(isr_ms, now_ms);
        self.step_inner(now_ms, pressed)
    }

    fn step_inner(&mut self, now_ms: u32, pressed: Option<ButtonEvent>) -> usize {
        if self.registrar.poll(now_ms, &mut self.coordinator).is_some() {
            self.events.push(Event::RegistrationAcked);
        }

        if pressed == Some(ButtonEvent::Pressed) {
            self.events.push(Event::ButtonPressed);
        }

        for _ in 0..REQUEST_DEPTH {
            let Some(req) = self.transport.poll_request() else {
                break;
            };
            let resp = self.service.handle_request(
                &req,
                &mut self.indicator,
                &mut self.coordinator,
                &mut self.sink,
            );
            self.transport.respond(req.client, resp);
        }

        // A step is one scheduling tick: the actuator is evaluated exactly once.
        self.events.push(Event::ActuatorTick);
        if now_ms.wrapping_sub(self.last_telemetry_ms) >= self.telemetry_ms {
            self.last_telemetry_ms = now_ms;
            self.events.push(Event::TelemetryTick);
        }

        // Dispatch never enqueues, so the queue can be detached while it drains.
        let mut events = core::mem::take(&mut self.events);
        let handled = events.drain(|event| self.dispatch(event));
        self.events = events;
        handled
    }

    fn dispatch(&mut self, event: Event) {
        match event {
            Event::RegistrationAcked => {
                self.service
                    .registered(self.registrar.attempts(), &mut self.sink);
                info!("runtime: endpoints online");
            }
            Event::ButtonPressed => {
                self.service
                    .press_reset(&mut self.indicator, &mut self.coordinator, &mut self.sink);
            }
            Event::ActuatorTick => {
                self.service.tick(&mut self.indicator, &mut self.sink);
            }
            Event::TelemetryTick => {
                let data = self.service.build_telemetry(self.registrar.is_registered());
                self.sink.emit(&AppEvent::Telemetry(data));
            }
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn service(&self) -> &NodeService {
        &self.service
    }

    pub fn registrar(&self) -> &Registrar {
        &self.registrar
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    pub fn coordinator(&self) -> &C {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut C {
        &mut self.coordinator
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn dropped_events(&self) -> u32 {
        self.events.dropped()
    }
}
