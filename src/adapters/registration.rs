//! Directory registration with bounded exponential backoff.
//!
//! On boot the node announces its device type to the coordinator and keeps
//! retrying until the coordinator acknowledges.  Endpoints stay hidden until
//! then.
//!
//! ```text
//!   Unregistered ──attempt──▶ Registered
//!        │ fail                   ▲
//!        ▼                        │ ok
//!   Backoff { retry_at } ──due──▶ attempt
//! ```
//!
//! Retry delays double from `registration_backoff_min_ms` up to
//! `registration_backoff_max_ms` (1 s → 2 s → 4 s … capped at 30 s).

use heapless::String;
use log::{error, info};
use serde::Serialize;

use crate::app::ports::RegistrationPort;
use crate::config::NodeConfig;
use crate::error::RegistrationError;

/// Body of the registration request: `{"type":"<device type>"}`.
#[derive(Serialize)]
struct RegisterRequest<'a> {
    #[serde(rename = "type")]
    device_type: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    Unregistered,
    Backoff { attempt: u32, retry_at_ms: u32 },
    Registered,
}

pub struct Registrar {
    coordinator: String<48>,
    path: String<24>,
    payload: String<48>,
    backoff_ms: u32,
    max_backoff_ms: u32,
    attempts: u32,
    state: RegistrationState,
}

impl Registrar {
    pub fn new(config: &NodeConfig) -> Result<Self, RegistrationError> {
        let body = serde_json::to_string(&RegisterRequest {
            device_type: config.profile.device_type(),
        })
        .map_err(|_| RegistrationError::Encoding)?;
        let mut payload = String::new();
        payload
            .push_str(&body)
            .map_err(|_| RegistrationError::Encoding)?;

        Ok(Self {
            coordinator: config.coordinator_uri.clone(),
            path: config.registration_path.clone(),
            payload,
            backoff_ms: config.registration_backoff_min_ms,
            max_backoff_ms: config.registration_backoff_max_ms,
            attempts: 0,
            state: RegistrationState::Unregistered,
        })
    }

    pub fn state(&self) -> RegistrationState {
        self.state
    }

    pub fn is_registered(&self) -> bool {
        self.state == RegistrationState::Registered
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The JSON body announced to the coordinator.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Attempt registration if one is due.
    ///
    /// Returns `Some(attempts)` on the call that gets acknowledged, `None`
    /// otherwise (not due, failed, or already registered).
    pub fn poll(&mut self, now_ms: u32, port: &mut impl RegistrationPort) -> Option<u32> {
        match self.state {
            RegistrationState::Registered => return None,
            RegistrationState::Backoff { retry_at_ms, .. } => {
                // Signed distance handles `now_ms` wrap-around.
                if (now_ms.wrapping_sub(retry_at_ms) as i32) < 0 {
                    return None;
                }
            }
            RegistrationState::Unregistered => {}
        }

        self.attempts = self.attempts.saturating_add(1);
        match port.register(&self.coordinator, &self.path, &self.payload) {
            Ok(()) => {
                self.state = RegistrationState::Registered;
                info!(
                    "registration: acknowledged by {}{} (attempt {})",
                    self.coordinator, self.path, self.attempts
                );
                Some(self.attempts)
            }
            Err(e) => {
                let delay = self.backoff_ms;
                error!(
                    "registration: attempt {} failed: {}; retrying in {} ms",
                    self.attempts, e, delay
                );
                self.state = RegistrationState::Backoff {
                    attempt: self.attempts,
                    retry_at_ms: now_ms.wrapping_add(delay),
                };
                self.backoff_ms = delay.saturating_mul(2).min(self.max_backoff_ms);
                None
            }
        }
    }
}
