//! Request/response channels between the transport task and the control loop.
//!
//! `embassy-sync` bounded channels carry decoded requests in and responses
//! out without heap allocation.  The control loop never blocks on them.
//!
//! ```text
//! ┌──────────────┐   Request    ┌──────────────┐
//! │  Transport   │────────────▶│ Control Loop  │
//! │  (CoAP task) │◀────────────│ (NodeRuntime) │
//! └──────────────┘   Reply      └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use super::{ClientId, Request, Response};
use crate::app::ports::{RequestSource, ResponseSink};

/// Inbound depth.
pub const REQUEST_DEPTH: usize = 8;
/// Outbound depth.
pub const REPLY_DEPTH: usize = 8;

/// Outbound response addressed to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub client: ClientId,
    pub response: Response,
}

pub type RequestChannel = Channel<CriticalSectionRawMutex, Request, REQUEST_DEPTH>;
pub type ReplyChannel = Channel<CriticalSectionRawMutex, Reply, REPLY_DEPTH>;

/// Device-wide inbound channel: transport → control loop.
pub static REQUESTS: RequestChannel = Channel::new();

/// Device-wide outbound channel: control loop → transport.
pub static REPLIES: ReplyChannel = Channel::new();

/// Control-loop end of a channel pair.
pub struct ChannelBridge {
    requests: &'static RequestChannel,
    replies: &'static ReplyChannel,
}

impl ChannelBridge {
    pub fn new(requests: &'static RequestChannel, replies: &'static ReplyChannel) -> Self {
        Self { requests, replies }
    }

    /// Bridge over the device-wide statics.
    pub fn global() -> Self {
        Self::new(&REQUESTS, &REPLIES)
    }
}

impl RequestSource for ChannelBridge {
    fn poll_request(&mut self) -> Option<Request> {
        self.requests.try_receive().ok()
    }
}

impl ResponseSink for ChannelBridge {
    fn respond(&mut self, client: ClientId, response: Response) {
        if self.replies.try_send(Reply { client, response }).is_err() {
            warn!("channels: reply queue full, dropping response to client {}", client.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    // Links the std critical-section implementation the channels lock with.
    use critical_section as _;

    static TEST_REQUESTS: RequestChannel = Channel::new();
    static TEST_REPLIES: ReplyChannel = Channel::new();

    #[test]
    fn bridge_moves_requests_and_replies() {
        let mut bridge = ChannelBridge::new(&TEST_REQUESTS, &TEST_REPLIES);
        assert!(bridge.poll_request().is_none());

        let req = Request::get(ClientId(3), "/humidity").unwrap();
        TEST_REQUESTS.try_send(req.clone()).unwrap();
        assert_eq!(bridge.poll_request(), Some(req));

        bridge.respond(ClientId(3), Response::changed());
        let reply = TEST_REPLIES.try_receive().unwrap();
        assert_eq!(reply.client, ClientId(3));
        assert_eq!(reply.response, Response::changed());
    }
}
