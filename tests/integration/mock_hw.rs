//! Mock adapters for integration tests.
//!
//! Each mock records every call so tests can assert on the full history
//! without touching real GPIO or a network.

use std::collections::VecDeque;

use wastenode::app::events::AppEvent;
use wastenode::app::ports::{
    EventSink, IndicatorPort, NotifyError, ObserverPort, RegistrationPort, RequestSource,
    ResponseSink,
};
use wastenode::drivers::indicator::IndicatorPattern;
use wastenode::endpoints::observe::{Notification, ObserverId};
use wastenode::endpoints::{ClientId, Request, Response};
use wastenode::error::RegistrationError;

// ── Indicator ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LampCall {
    Show(IndicatorPattern),
    Fill(bool),
}

#[derive(Default)]
pub struct MockIndicator {
    pub calls: Vec<LampCall>,
}

#[allow(dead_code)]
impl MockIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last anomaly pattern written.
    pub fn pattern(&self) -> Option<IndicatorPattern> {
        self.calls.iter().rev().find_map(|c| match c {
            LampCall::Show(p) => Some(*p),
            LampCall::Fill(_) => None,
        })
    }

    /// Last fill-lamp state written.
    pub fn fill(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|c| match c {
            LampCall::Fill(f) => Some(*f),
            LampCall::Show(_) => None,
        })
    }
}

impl IndicatorPort for MockIndicator {
    fn show(&mut self, pattern: IndicatorPattern) {
        self.calls.push(LampCall::Show(pattern));
    }

    fn show_fill(&mut self, full: bool) {
        self.calls.push(LampCall::Fill(full));
    }
}

// ── Coordinator (registration + observers) ────────────────────

#[derive(Default)]
pub struct MockCoordinator {
    /// Registration attempts to reject before acknowledging.
    pub reject_first: u32,
    pub registrations: Vec<(String, String, String)>,
    pub notifications: Vec<(ObserverId, Notification)>,
    /// Clients whose notifications fail.
    pub unreachable: Vec<ClientId>,
}

#[allow(dead_code)]
impl MockCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(n: u32) -> Self {
        Self {
            reject_first: n,
            ..Self::default()
        }
    }
}

impl RegistrationPort for MockCoordinator {
    fn register(
        &mut self,
        coordinator: &str,
        path: &str,
        payload: &str,
    ) -> Result<(), RegistrationError> {
        self.registrations
            .push((coordinator.to_string(), path.to_string(), payload.to_string()));
        if self.reject_first > 0 {
            self.reject_first -= 1;
            return Err(RegistrationError::Timeout);
        }
        Ok(())
    }
}

impl ObserverPort for MockCoordinator {
    fn notify(&mut self, observer: ObserverId, n: &Notification) -> Result<(), NotifyError> {
        if self.unreachable.contains(&observer.0) {
            return Err(NotifyError::Unreachable);
        }
        self.notifications.push((observer, *n));
        Ok(())
    }
}

// ── Transport ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockTransport {
    pub inbound: VecDeque<Request>,
    pub replies: Vec<(ClientId, Response)>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, req: Request) {
        self.inbound.push_back(req);
    }
}

impl RequestSource for MockTransport {
    fn poll_request(&mut self) -> Option<Request> {
        self.inbound.pop_front()
    }
}

impl ResponseSink for MockTransport {
    fn respond(&mut self, client: ClientId, response: Response) {
        self.replies.push((client, response));
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
