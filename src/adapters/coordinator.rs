//! Loopback coordinator link.
//!
//! Implements [`RegistrationPort`] and [`ObserverPort`] without a network:
//! registrations are acknowledged immediately and notifications are logged.
//! The device image uses it until the CoAP transport task is wired in.

use log::info;

use crate::app::ports::{NotifyError, ObserverPort, RegistrationPort};
use crate::endpoints::observe::{Notification, ObserverId};
use crate::error::RegistrationError;

#[derive(Debug, Default)]
pub struct LoopbackCoordinator {
    registrations: u32,
    notifications: u32,
}

impl LoopbackCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registrations(&self) -> u32 {
        self.registrations
    }

    pub fn notifications(&self) -> u32 {
        self.notifications
    }
}

impl RegistrationPort for LoopbackCoordinator {
    fn register(
        &mut self,
        coordinator: &str,
        path: &str,
        payload: &str,
    ) -> Result<(), RegistrationError> {
        self.registrations += 1;
        info!("coordinator(loopback): {}{} <- {}", coordinator, path, payload);
        Ok(())
    }
}

impl ObserverPort for LoopbackCoordinator {
    fn notify(&mut self, observer: ObserverId, n: &Notification) -> Result<(), NotifyError> {
        self.notifications += 1;
        info!(
            "coordinator(loopback): notify client {} /{} seq={}",
            observer.0.0, n.resource, n.seq
        );
        Ok(())
    }
}
