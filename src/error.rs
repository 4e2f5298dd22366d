//! Unified error types for the WasteNode firmware.
//!
//! Every request handler funnels its failure into [`RequestError`], which
//! the endpoint router maps onto a protocol response code.  All variants
//! are `Copy` so they can be passed through the service and logged
//! without allocation.

use core::fmt;

use crate::app::ports::{ConfigError, NotifyError};

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible subsystem converts into this type at the top level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A request was rejected by an endpoint.
    Request(RequestError),
    /// Directory registration failed.
    Registration(RegistrationError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// An observer notification could not be delivered.
    Notify(NotifyError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(e) => write!(f, "request: {e}"),
            Self::Registration(e) => write!(f, "registration: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Notify(e) => write!(f, "notify: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Field extraction errors
// ---------------------------------------------------------------------------

/// Failure modes of the flat-JSON field extractor.
///
/// None of these is surfaced to a remote caller directly; endpoints turn
/// them into [`RequestError::MalformedRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// The key does not appear in the object.
    KeyNotFound,
    /// The text is not a flat JSON object.
    Syntax,
    /// The value exists but could not be converted to the requested type.
    InvalidValue,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyNotFound => write!(f, "key not found"),
            Self::Syntax => write!(f, "not a flat JSON object"),
            Self::InvalidValue => write!(f, "value has the wrong type"),
        }
    }
}

impl std::error::Error for FieldError {}

// ---------------------------------------------------------------------------
// Request errors
// ---------------------------------------------------------------------------

/// Errors returned by endpoint handlers.
///
/// A failed request never mutates the anomaly or override state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    /// Payload empty, required field missing, or field of the wrong type.
    MalformedRequest(&'static str),
    /// No such endpoint, or it has not been activated yet.
    NotFound,
    /// The endpoint exists but does not support this method.
    MethodNotAllowed,
    /// Payload exceeds the fixed request buffer.
    PayloadTooLarge,
    /// The observer table is full.
    ObserverLimit,
}

impl RequestError {
    /// Map an extractor failure for `field` onto a client error.
    pub fn from_field(err: FieldError) -> Self {
        match err {
            FieldError::KeyNotFound => Self::MalformedRequest("required field missing"),
            FieldError::Syntax => Self::MalformedRequest("payload is not a flat JSON object"),
            FieldError::InvalidValue => Self::MalformedRequest("field has the wrong type"),
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRequest(reason) => write!(f, "malformed request: {reason}"),
            Self::NotFound => write!(f, "endpoint not found"),
            Self::MethodNotAllowed => write!(f, "method not allowed"),
            Self::PayloadTooLarge => write!(f, "payload too large"),
            Self::ObserverLimit => write!(f, "observer table full"),
        }
    }
}

impl std::error::Error for RequestError {}

impl From<FieldError> for RequestError {
    fn from(e: FieldError) -> Self {
        Self::from_field(e)
    }
}

impl From<RequestError> for Error {
    fn from(e: RequestError) -> Self {
        Self::Request(e)
    }
}

// ---------------------------------------------------------------------------
// Registration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationError {
    /// The coordinator did not answer before the transport gave up.
    Timeout,
    /// The coordinator answered with an error code.
    Rejected,
    /// The registration payload could not be built.
    Encoding,
    /// The transport could not send the request.
    Transport,
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "coordinator timed out"),
            Self::Rejected => write!(f, "coordinator rejected registration"),
            Self::Encoding => write!(f, "registration payload encoding failed"),
            Self::Transport => write!(f, "transport send failed"),
        }
    }
}

impl std::error::Error for RegistrationError {}

impl From<RegistrationError> for Error {
    fn from(e: RegistrationError) -> Self {
        Self::Registration(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<NotifyError> for Error {
    fn from(e: NotifyError) -> Self {
        Self::Notify(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_become_malformed_requests() {
        for e in [FieldError::KeyNotFound, FieldError::Syntax, FieldError::InvalidValue] {
            assert!(matches!(RequestError::from(e), RequestError::MalformedRequest(_)));
        }
    }

    #[test]
    fn display_includes_category() {
        let e: Error = RequestError::NotFound.into();
        assert_eq!(e.to_string(), "request: endpoint not found");
        let e: Error = RegistrationError::Timeout.into();
        assert_eq!(e.to_string(), "registration: coordinator timed out");
    }
}
