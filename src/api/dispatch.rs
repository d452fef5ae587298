//! Tag dispatch.
//!
//! Dispatch is total: any tag against any registry yields exactly one
//! response packet.
//!
//! ```text
//! RECEIVED → LOOKUP ─┬─ found ─────► INVOKED ────┬─► RESPONDED
//!                    └─ not found ─► UNRESOLVED ─┘
//! ```
//!
//! Statuses returned by handlers (including `QUIT` and `WAIT`) are passed
//! through untouched; acting on them is the connection loop's job.

use super::craft::craft;
use super::registry::ApiCalls;
use super::ApiStatus;
use crate::tlv::{TlvPacket, TLV_TYPE_STATUS};

impl<C: 'static> ApiCalls<C> {
    /// Run the handler registered for `tag` and return its response.
    ///
    /// Unknown tags get a status-only `NOT_IMPLEMENTED` packet. Handler
    /// output is returned as is.
    pub fn dispatch(&self, ctx: &mut C, tag: i32) -> TlvPacket {
        match self.lookup(tag) {
            Some(handler) => {
                tracing::trace!("Dispatching tag {}", tag);
                handler.call(ctx)
            }
            None => {
                tracing::debug!("No handler for tag {}", tag);
                craft(ApiStatus::NotImplemented)
            }
        }
    }
}

/// Read the status field of a response.
///
/// Returns `None` if the field is missing or holds an unknown code.
pub fn response_status(packet: &TlvPacket) -> Option<ApiStatus> {
    packet
        .get_int(TLV_TYPE_STATUS)
        .and_then(|code| ApiStatus::try_from(code).ok())
}
