//! Built-in commands every session answers.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::api::{boxed, craft, ApiCalls, ApiStatus};
use crate::c2::C2;
use crate::error::Result;
use crate::tlv::{TlvPacket, BUILTIN_QUIT, BUILTIN_TIME, BUILTIN_UUID, TLV_TYPE_TIME, TLV_TYPE_UUID};

/// Register all built-in commands.
pub fn register(calls: &mut ApiCalls<C2>) -> Result<()> {
    calls.register_many([
        (BUILTIN_QUIT, boxed(quit)),
        (BUILTIN_TIME, boxed(time)),
        (BUILTIN_UUID, boxed(uuid)),
    ])
}

/// `BUILTIN_QUIT`: end the session.
pub fn quit(_ctx: &mut C2) -> TlvPacket {
    craft(ApiStatus::Quit)
}

/// `BUILTIN_UUID`: report the session uuid.
pub fn uuid(ctx: &mut C2) -> TlvPacket {
    let mut response = craft(ApiStatus::Success);
    response.add_string(TLV_TYPE_UUID, ctx.uuid());
    response
}

/// `BUILTIN_TIME`: report seconds since the Unix epoch.
///
/// The value saturates at `i32::MAX`.
pub fn time(_ctx: &mut C2) -> TlvPacket {
    let secs = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs(),
        Err(e) => {
            tracing::warn!("System clock before Unix epoch: {}", e);
            return craft(ApiStatus::Fail);
        }
    };

    let mut response = craft(ApiStatus::Success);
    response.add_int(TLV_TYPE_TIME, i32::try_from(secs).unwrap_or(i32::MAX));
    response
}
