//! Synthetic status-only responses.
//!
//! Every response the core builds itself (rather than a handler) has the
//! same shape: one integer field, `TLV_TYPE_STATUS`. Handlers usually start
//! from [`craft`] and append their own fields.

use super::ApiStatus;
use crate::error::Result;
use crate::tlv::{TlvPacket, TLV_TYPE_STATUS};

/// Build a packet carrying only the given status.
pub fn craft(status: ApiStatus) -> TlvPacket {
    let mut packet = TlvPacket::new();
    packet.add_int(TLV_TYPE_STATUS, status.as_i32());
    packet
}

/// Build a status-only packet, surfacing allocation failure.
///
/// # Errors
///
/// Returns [`ApiError::Alloc`](crate::ApiError::Alloc) if the field storage
/// cannot be reserved.
pub fn try_craft(status: ApiStatus) -> Result<TlvPacket> {
    let mut packet = TlvPacket::new();
    packet.try_add_int(TLV_TYPE_STATUS, status.as_i32())?;
    Ok(packet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_craft_has_single_status_field() {
        for status in ApiStatus::ALL {
            let packet = craft(status);
            assert_eq!(packet.len(), 1);
            assert_eq!(packet.fields()[0].ty, TLV_TYPE_STATUS);
            assert_eq!(packet.get_int(TLV_TYPE_STATUS), Some(status.as_i32()));
        }
    }

    #[test]
    fn test_try_craft_matches_craft() {
        for status in ApiStatus::ALL {
            assert_eq!(try_craft(status).unwrap(), craft(status));
        }
    }

    #[test]
    fn test_crafted_encoding_is_stable() {
        let body = craft(ApiStatus::NotImplemented).encode();
        let mut expected = Vec::new();
        expected.extend_from_slice(&TLV_TYPE_STATUS.to_be_bytes());
        expected.extend_from_slice(&4u32.to_be_bytes());
        expected.extend_from_slice(&4i32.to_be_bytes());
        assert_eq!(body, expected);
    }
}
