//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ NodeService (domain)
//! ```
//!
//! Driven adapters (indicator lamps, observers, event sinks, storage,
//! coordinator link) implement these traits.  The
//! [`NodeService`](super::service::NodeService) and
//! [`NodeRuntime`](crate::runtime::NodeRuntime) consume them via generics,
//! so the domain core never touches hardware or transport directly.

use crate::config::NodeConfig;
use crate::drivers::indicator::IndicatorPattern;
use crate::endpoints::observe::{Notification, ObserverId};
use crate::endpoints::{ClientId, Request, Response};
use crate::error::RegistrationError;

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → lamps)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to drive the physical indicator.
pub trait IndicatorPort {
    /// Show an anomaly pattern now.  Called every tick; must be idempotent.
    fn show(&mut self, pattern: IndicatorPattern);

    /// Switch the bin-full lamp.
    fn show_fill(&mut self, full: bool);
}

// ───────────────────────────────────────────────────────────────
// Observer port (driven adapter: domain → subscribed watchers)
// ───────────────────────────────────────────────────────────────

/// Delivers reset notifications to remote watchers.  Best effort: the
/// domain logs failures and moves on.
pub trait ObserverPort {
    fn notify(&mut self, observer: ObserverId, notification: &Notification)
    -> Result<(), NotifyError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists node configuration.
///
/// Implementations MUST validate before persisting; invalid values are
/// rejected with [`ConfigError::ValidationFailed`], never clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    fn load(&self) -> Result<NodeConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &NodeConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Coordinator port (driven adapter: domain → resource directory)
// ───────────────────────────────────────────────────────────────

/// One blocking registration exchange with the directory coordinator.
pub trait RegistrationPort {
    /// Send `payload` to `path` on `coordinator`; `Ok` means acknowledged.
    fn register(
        &mut self,
        coordinator: &str,
        path: &str,
        payload: &str,
    ) -> Result<(), RegistrationError>;
}

// ───────────────────────────────────────────────────────────────
// Request transport ports (driving adapter: transport → domain)
// ───────────────────────────────────────────────────────────────

/// Non-blocking source of decoded requests.
pub trait RequestSource {
    fn poll_request(&mut self) -> Option<Request>;
}

/// Destination for responses, addressed by the requesting client.
pub trait ResponseSink {
    fn respond(&mut self, client: ClientId, response: Response);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`ObserverPort::notify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyError {
    /// The watcher is no longer reachable.
    Unreachable,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl core::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unreachable => write!(f, "observer unreachable"),
        }
    }
}

impl std::error::Error for NotifyError {}
