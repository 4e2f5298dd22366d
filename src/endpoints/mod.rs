//! Request/response surface of the node.
//!
//! The transport (CoAP on the device) decodes datagrams into [`Request`]s and
//! pushes them through [`channels`]; the control loop answers with a
//! [`Response`].  This module only defines the decoded shapes and the
//! [`Router`] that maps a path onto one of the node's endpoints.
//!
//! ```text
//!   /temperature   GET, PUT {"threshold":n}
//!   /humidity      GET, PUT {"threshold":n}
//!   /distance      GET, PUT {"distance":n}
//!   /anomaly       GET, PUT {"action":b}, DELETE
//!   /button        GET (observe), POST
//! ```

pub mod channels;
pub mod observe;
pub mod override_ep;
pub mod reset;

use heapless::{String, Vec};
use log::debug;

use crate::error::RequestError;

/// Longest resource path accepted from the transport.
pub const PATH_CAP: usize = 16;
/// Largest request payload accepted from the transport.
pub const REQUEST_PAYLOAD_CAP: usize = 64;
/// Largest response payload the node produces.
pub const RESPONSE_PAYLOAD_CAP: usize = 128;

/// The five resources a node can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointId {
    Temperature,
    Humidity,
    Distance,
    Anomaly,
    Button,
}

impl EndpointId {
    pub const ALL: [EndpointId; 5] = [
        Self::Temperature,
        Self::Humidity,
        Self::Distance,
        Self::Anomaly,
        Self::Button,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Distance => "distance",
            Self::Anomaly => "anomaly",
            Self::Button => "button",
        }
    }

    /// Match a path with or without the leading slash.
    pub fn from_path(path: &str) -> Option<Self> {
        let name = path.strip_prefix('/').unwrap_or(path);
        Self::ALL.into_iter().find(|id| id.name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
}

/// Observe option carried on a GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observe {
    Register,
    Deregister,
}

/// Transport-level identity of the requesting peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub u16);

/// A decoded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub client: ClientId,
    pub method: Method,
    pub path: String<PATH_CAP>,
    pub payload: Vec<u8, REQUEST_PAYLOAD_CAP>,
    pub observe: Option<Observe>,
}

impl Request {
    /// Build a request, rejecting oversized paths and payloads.
    pub fn new(
        client: ClientId,
        method: Method,
        path: &str,
        payload: &[u8],
    ) -> Result<Self, RequestError> {
        let mut p = String::new();
        p.push_str(path).map_err(|_| RequestError::NotFound)?;
        let body = Vec::from_slice(payload).map_err(|_| RequestError::PayloadTooLarge)?;
        Ok(Self {
            client,
            method,
            path: p,
            payload: body,
            observe: None,
        })
    }

    pub fn get(client: ClientId, path: &str) -> Result<Self, RequestError> {
        Self::new(client, Method::Get, path, &[])
    }

    pub fn put(client: ClientId, path: &str, payload: &[u8]) -> Result<Self, RequestError> {
        Self::new(client, Method::Put, path, payload)
    }

    pub fn post(client: ClientId, path: &str) -> Result<Self, RequestError> {
        Self::new(client, Method::Post, path, &[])
    }

    pub fn delete(client: ClientId, path: &str) -> Result<Self, RequestError> {
        Self::new(client, Method::Delete, path, &[])
    }

    /// GET carrying the observe option.
    pub fn observe(client: ClientId, path: &str, observe: Observe) -> Result<Self, RequestError> {
        let mut req = Self::get(client, path)?;
        req.observe = Some(observe);
        Ok(req)
    }
}

/// Response codes, named after their CoAP counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    /// 2.04
    Changed,
    /// 2.05
    Content,
    /// 4.00
    BadRequest,
    /// 4.04
    NotFound,
    /// 4.05
    MethodNotAllowed,
    /// 4.13
    RequestEntityTooLarge,
    /// 5.03
    ServiceUnavailable,
}

impl ResponseCode {
    /// `(class, detail)` pair as carried on the wire.
    pub fn class_detail(self) -> (u8, u8) {
        match self {
            Self::Changed => (2, 4),
            Self::Content => (2, 5),
            Self::BadRequest => (4, 0),
            Self::NotFound => (4, 4),
            Self::MethodNotAllowed => (4, 5),
            Self::RequestEntityTooLarge => (4, 13),
            Self::ServiceUnavailable => (5, 3),
        }
    }

    pub fn is_success(self) -> bool {
        self.class_detail().0 == 2
    }
}

impl core::fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (class, detail) = self.class_detail();
        write!(f, "{}.{:02}", class, detail)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub code: ResponseCode,
    pub payload: Vec<u8, RESPONSE_PAYLOAD_CAP>,
}

impl Response {
    pub fn changed() -> Self {
        Self::empty(ResponseCode::Changed)
    }

    pub fn empty(code: ResponseCode) -> Self {
        Self {
            code,
            payload: Vec::new(),
        }
    }

    /// 2.05 with a body.  A body too large for the buffer is a bug in the
    /// encoder, reported as 5.03 rather than a truncated document.
    pub fn content(body: &[u8]) -> Self {
        match Vec::from_slice(body) {
            Ok(payload) => Self {
                code: ResponseCode::Content,
                payload,
            },
            Err(_) => Self::empty(ResponseCode::ServiceUnavailable),
        }
    }

    pub fn payload_str(&self) -> &str {
        core::str::from_utf8(&self.payload).unwrap_or("")
    }
}

impl From<RequestError> for Response {
    fn from(e: RequestError) -> Self {
        let code = match e {
            RequestError::MalformedRequest(_) => ResponseCode::BadRequest,
            RequestError::NotFound => ResponseCode::NotFound,
            RequestError::MethodNotAllowed => ResponseCode::MethodNotAllowed,
            RequestError::PayloadTooLarge => ResponseCode::RequestEntityTooLarge,
            RequestError::ObserverLimit => ResponseCode::ServiceUnavailable,
        };
        Self::empty(code)
    }
}

/// Maps paths to the set of endpoints currently exposed.
///
/// Starts empty: nothing is reachable until the coordinator acknowledges
/// registration and the profile's endpoints are activated.
#[derive(Debug, Default)]
pub struct Router {
    active: Vec<EndpointId, 5>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose `ids`.  Already-active endpoints are skipped.
    pub fn activate(&mut self, ids: &[EndpointId]) {
        for &id in ids {
            if !self.active.contains(&id) {
                // Capacity equals the number of endpoint kinds.
                let _ = self.active.push(id);
                debug!("router: /{} active", id.name());
            }
        }
    }

    pub fn is_active(&self, id: EndpointId) -> bool {
        self.active.contains(&id)
    }

    pub fn active(&self) -> &[EndpointId] {
        &self.active
    }

    /// Resolve a request path to an active endpoint.
    pub fn resolve(&self, path: &str) -> Result<EndpointId, RequestError> {
        EndpointId::from_path(path)
            .filter(|id| self.is_active(*id))
            .ok_or(RequestError::NotFound)
    }
}
