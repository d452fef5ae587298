//! Field type ids and command tag numbering.
//!
//! Field types are grouped in classes by value encoding:
//! ```text
//! Class             Base    Value encoding
//! TLV_TYPE_INT      20000   i32 BE, exactly 4 bytes
//! TLV_TYPE_STRING   30000   UTF-8, no terminator
//! TLV_TYPE_BYTES    40000   raw bytes
//! ```
//!
//! Command tags live in pools (internal, static, dynamic). Within a pool a
//! command group occupies a block of 1000 ids.

/// Width of a command group block inside a tag pool.
pub const TLV_TAG_CHILD: i32 = 1000;

/// Width of a field group block inside a type class.
pub const TLV_TYPE_CHILD: i32 = 1000;

/// Integer field class.
pub const TLV_TYPE_INT: i32 = 20000;
/// String field class.
pub const TLV_TYPE_STRING: i32 = 30000;
/// Bytes field class.
pub const TLV_TYPE_BYTES: i32 = 40000;

/// Status code of a response.
pub const TLV_TYPE_STATUS: i32 = TLV_TYPE_INT + 1;
/// Command tag of a request.
pub const TLV_TYPE_TAG: i32 = TLV_TYPE_INT + 2;
/// Seconds since the Unix epoch.
pub const TLV_TYPE_TIME: i32 = TLV_TYPE_INT + 4;
/// Session uuid.
pub const TLV_TYPE_UUID: i32 = TLV_TYPE_STRING + 1;

/// Commands handled by the agent core itself.
pub const API_CALL_INTERNAL: i32 = 10000;
/// Commands compiled into the agent.
pub const API_CALL_STATIC: i32 = 20000;
/// Commands added at runtime by the controller.
pub const API_CALL_DYNAMIC: i32 = 40000;

/// First call id inside a group.
pub const API_CALL: i32 = 1;
/// First field id inside a group.
pub const API_TYPE: i32 = 1;

/// Group of the built-in commands.
pub const BUILTIN_BASE: i32 = 1;

/// Build a command tag from its pool, group and call id.
///
/// ```
/// use api_calls::tlv::{tlv_custom_tag, API_CALL, API_CALL_STATIC};
///
/// assert_eq!(tlv_custom_tag(API_CALL_STATIC, 3, API_CALL + 2), 23003);
/// ```
#[inline]
pub const fn tlv_custom_tag(pool: i32, base: i32, call: i32) -> i32 {
    pool + base * TLV_TAG_CHILD + call
}

/// Build a field type id from its class, group and field id.
#[inline]
pub const fn tlv_custom_type(class: i32, base: i32, ty: i32) -> i32 {
    class + base * TLV_TYPE_CHILD + ty
}

/// Terminate the session after the response is sent.
pub const BUILTIN_QUIT: i32 = tlv_custom_tag(API_CALL_STATIC, BUILTIN_BASE, API_CALL);
/// Report the agent clock.
pub const BUILTIN_TIME: i32 = tlv_custom_tag(API_CALL_STATIC, BUILTIN_BASE, API_CALL + 5);
/// Report the session uuid.
pub const BUILTIN_UUID: i32 = tlv_custom_tag(API_CALL_STATIC, BUILTIN_BASE, API_CALL + 7);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tags() {
        assert_eq!(BUILTIN_QUIT, 21001);
        assert_eq!(BUILTIN_TIME, 21006);
        assert_eq!(BUILTIN_UUID, 21008);
    }

    #[test]
    fn test_custom_types_do_not_collide_with_reserved() {
        let custom = tlv_custom_type(TLV_TYPE_INT, 1, API_TYPE);
        assert_eq!(custom, 21001);
        assert_ne!(custom, TLV_TYPE_STATUS);
        assert_ne!(custom, TLV_TYPE_TAG);
    }

    #[test]
    fn test_pools_are_disjoint() {
        let internal_max = tlv_custom_tag(API_CALL_INTERNAL, 9, 999);
        assert!(internal_max < API_CALL_STATIC);
        assert!(tlv_custom_tag(API_CALL_STATIC, 9, 999) < API_CALL_DYNAMIC);
    }
}
