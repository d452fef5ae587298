//! Connection context passed to handlers.
//!
//! Holds what a handler may need about the session it runs in: the session
//! uuid and the request packet being served.
//!
//! # Example
//!
//! ```
//! use api_calls::api::{craft, ApiStatus};
//! use api_calls::tlv::{TlvPacket, TLV_TYPE_UUID};
//! use api_calls::C2;
//!
//! fn whoami(ctx: &mut C2) -> TlvPacket {
//!     let mut response = craft(ApiStatus::Success);
//!     response.add_string(TLV_TYPE_UUID, ctx.uuid());
//!     response
//! }
//!
//! let mut ctx = C2::new("agent-1");
//! assert_eq!(whoami(&mut ctx).get_string(TLV_TYPE_UUID), Some("agent-1"));
//! ```

use uuid::Uuid;

use crate::tlv::TlvPacket;

/// Context for one controller connection.
#[derive(Debug, Clone)]
pub struct C2 {
    /// Session uuid.
    uuid: String,
    /// Request currently being dispatched.
    request: TlvPacket,
    /// Requests received so far.
    received: u64,
}

impl C2 {
    /// Create a context with the given session uuid.
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            request: TlvPacket::new(),
            received: 0,
        }
    }

    /// Session uuid.
    #[inline]
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Request currently being served (arguments live here).
    #[inline]
    pub fn request(&self) -> &TlvPacket {
        &self.request
    }

    /// Number of requests received on this connection.
    #[inline]
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Install the next request.
    pub(crate) fn begin(&mut self, request: TlvPacket) {
        self.request = request;
        self.received += 1;
    }
}

/// Generate a random (version 4) session uuid.
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}
