//! TLV packet with typed field accessors.
//!
//! A packet is an ordered list of fields. On the wire each field is:
//! ```text
//! ┌──────────┬──────────┬──────────────┐
//! │ Type     │ Length   │ Value        │
//! │ 4 bytes  │ 4 bytes  │ Length bytes │
//! │ int32 BE │ uint32 BE│              │
//! └──────────┴──────────┴──────────────┘
//! ```
//!
//! and a packet frame is a `uint32 BE` body length followed by the fields.
//!
//! # Example
//!
//! ```
//! use api_calls::tlv::{TlvPacket, TLV_TYPE_TAG, TLV_TYPE_UUID};
//!
//! let mut packet = TlvPacket::new();
//! packet.add_int(TLV_TYPE_TAG, 21008).add_string(TLV_TYPE_UUID, "abc");
//!
//! assert_eq!(packet.get_int(TLV_TYPE_TAG), Some(21008));
//! assert_eq!(packet.get_string(TLV_TYPE_UUID), Some("abc"));
//! ```

use bytes::{BufMut, Bytes};

use crate::error::{ApiError, Result};

/// Field header size in bytes (type + length).
pub const FIELD_HEADER_SIZE: usize = 8;

/// Packet frame header size in bytes (body length).
pub const PACKET_HEADER_SIZE: usize = 4;

/// Default maximum packet body size (16 MB).
pub const DEFAULT_MAX_PACKET_SIZE: u32 = 16 * 1024 * 1024;

/// A single typed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvField {
    /// Field type id.
    pub ty: i32,
    /// Raw value bytes (zero-copy via `bytes::Bytes`).
    pub value: Bytes,
}

impl TlvField {
    /// Create a new field.
    pub fn new(ty: i32, value: Bytes) -> Self {
        Self { ty, value }
    }

    /// Encoded size of this field (header + value).
    #[inline]
    pub fn encoded_len(&self) -> usize {
        FIELD_HEADER_SIZE + self.value.len()
    }
}

/// An ordered collection of TLV fields.
///
/// Fields of the same type may repeat; getters return the first match and
/// [`TlvPacket::get_all`] iterates every match in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlvPacket {
    fields: Vec<TlvField>,
}

impl TlvPacket {
    /// Create an empty packet.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a raw field.
    pub fn add(&mut self, ty: i32, value: impl Into<Bytes>) -> &mut Self {
        self.fields.push(TlvField::new(ty, value.into()));
        self
    }

    /// Append an integer field (fixed width, 4 bytes BE).
    pub fn add_int(&mut self, ty: i32, value: i32) -> &mut Self {
        self.add(ty, Bytes::copy_from_slice(&value.to_be_bytes()))
    }

    /// Append a string field.
    pub fn add_string(&mut self, ty: i32, value: &str) -> &mut Self {
        self.add(ty, Bytes::copy_from_slice(value.as_bytes()))
    }

    /// Append a bytes field.
    pub fn add_bytes(&mut self, ty: i32, value: impl Into<Bytes>) -> &mut Self {
        self.add(ty, value)
    }

    /// Append an integer field, reporting allocation failure instead of aborting.
    pub fn try_add_int(&mut self, ty: i32, value: i32) -> Result<()> {
        self.fields.try_reserve(1)?;
        self.fields
            .push(TlvField::new(ty, Bytes::copy_from_slice(&value.to_be_bytes())));
        Ok(())
    }

    /// Get the first field value of the given type.
    pub fn get(&self, ty: i32) -> Option<&Bytes> {
        self.fields.iter().find(|f| f.ty == ty).map(|f| &f.value)
    }

    /// Iterate over every field value of the given type.
    pub fn get_all(&self, ty: i32) -> impl Iterator<Item = &Bytes> + '_ {
        self.fields
            .iter()
            .filter(move |f| f.ty == ty)
            .map(|f| &f.value)
    }

    /// Get an integer field.
    ///
    /// Returns `None` if the field is missing or is not exactly 4 bytes.
    pub fn get_int(&self, ty: i32) -> Option<i32> {
        let value = self.get(ty)?;
        let raw: [u8; 4] = value.as_ref().try_into().ok()?;
        Some(i32::from_be_bytes(raw))
    }

    /// Get a string field.
    ///
    /// Returns `None` if the field is missing or is not valid UTF-8.
    pub fn get_string(&self, ty: i32) -> Option<&str> {
        std::str::from_utf8(self.get(ty)?).ok()
    }

    /// Get a bytes field.
    pub fn get_bytes(&self, ty: i32) -> Option<&[u8]> {
        self.get(ty).map(|b| b.as_ref())
    }

    /// All fields in insertion order.
    #[inline]
    pub fn fields(&self) -> &[TlvField] {
        &self.fields
    }

    /// Number of fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the packet has no fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encoded body size (sum of all fields).
    pub fn encoded_len(&self) -> usize {
        self.fields.iter().map(TlvField::encoded_len).sum()
    }

    /// Encode the packet body into a buffer.
    ///
    /// Field lengths are written as `u32`; use [`build_packet_frame`] for
    /// outgoing data, which rejects bodies that do not fit.
    pub fn encode_into<B: BufMut>(&self, buf: &mut B) {
        for field in &self.fields {
            buf.put_i32(field.ty);
            buf.put_u32(field.value.len() as u32);
            buf.put_slice(&field.value);
        }
    }

    /// Encode the packet body into a new vector.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        buf
    }

    /// Decode a packet body.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if a field header or value is truncated.
    pub fn decode(body: Bytes) -> Result<Self> {
        let mut fields = Vec::new();
        let mut offset = 0;

        while offset < body.len() {
            let rest = &body[offset..];
            if rest.len() < FIELD_HEADER_SIZE {
                return Err(ApiError::Protocol(format!(
                    "Truncated field header at offset {}",
                    offset
                )));
            }

            let ty = i32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]);
            let len = u32::from_be_bytes([rest[4], rest[5], rest[6], rest[7]]) as usize;

            let start = offset + FIELD_HEADER_SIZE;
            let end = start
                .checked_add(len)
                .filter(|&end| end <= body.len())
                .ok_or_else(|| {
                    ApiError::Protocol(format!(
                        "Field {} declares {} bytes, only {} left",
                        ty,
                        len,
                        body.len() - start
                    ))
                })?;

            fields.push(TlvField::new(ty, body.slice(start..end)));
            offset = end;
        }

        Ok(Self { fields })
    }
}

/// Build a complete packet frame (length prefix + body).
///
/// # Errors
///
/// Returns a protocol error if the body does not fit the `u32` length prefix.
///
/// # Example
///
/// ```
/// use api_calls::tlv::{build_packet_frame, TlvPacket, TLV_TYPE_STATUS};
///
/// let mut packet = TlvPacket::new();
/// packet.add_int(TLV_TYPE_STATUS, 1);
///
/// let frame = build_packet_frame(&packet).unwrap();
/// assert_eq!(frame.len(), 4 + 8 + 4);
/// ```
pub fn build_packet_frame(packet: &TlvPacket) -> Result<Vec<u8>> {
    let body_len = packet.encoded_len();
    let prefix = u32::try_from(body_len).map_err(|_| {
        ApiError::Protocol(format!("Packet body of {} bytes is too large", body_len))
    })?;

    let mut buf = Vec::with_capacity(PACKET_HEADER_SIZE + body_len);
    buf.put_u32(prefix);
    packet.encode_into(&mut buf);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tlv::types::{
        tlv_custom_type, API_TYPE, TLV_TYPE_BYTES, TLV_TYPE_STATUS, TLV_TYPE_TAG, TLV_TYPE_UUID,
    };

    #[test]
    fn test_int_field_is_fixed_width_big_endian() {
        let mut packet = TlvPacket::new();
        packet.add_int(TLV_TYPE_STATUS, 0x0102_0304);

        let body = packet.encode();
        assert_eq!(body.len(), FIELD_HEADER_SIZE + 4);

        // Type: 20001 in BE
        assert_eq!(&body[0..4], &20001i32.to_be_bytes());
        // Length: 4
        assert_eq!(&body[4..8], &[0, 0, 0, 4]);
        // Value
        assert_eq!(&body[8..12], &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_negative_int_preserved() {
        let mut packet = TlvPacket::new();
        packet.add_int(TLV_TYPE_TAG, -7);

        let decoded = TlvPacket::decode(Bytes::from(packet.encode())).unwrap();
        assert_eq!(decoded.get_int(TLV_TYPE_TAG), Some(-7));
    }

    #[test]
    fn test_mixed_fields_decode_in_order() {
        let blob = tlv_custom_type(TLV_TYPE_BYTES, 1, API_TYPE);
        let mut packet = TlvPacket::new();
        packet
            .add_int(TLV_TYPE_TAG, 21001)
            .add_string(TLV_TYPE_UUID, "session")
            .add_bytes(blob, Bytes::from_static(b"\x00\xff"));

        let decoded = TlvPacket::decode(Bytes::from(packet.encode())).unwrap();
        assert_eq!(decoded, packet);
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded.get_bytes(blob), Some(&b"\x00\xff"[..]));
    }

    #[test]
    fn test_repeated_fields() {
        let mut packet = TlvPacket::new();
        packet
            .add_string(TLV_TYPE_UUID, "first")
            .add_string(TLV_TYPE_UUID, "second");

        assert_eq!(packet.get_string(TLV_TYPE_UUID), Some("first"));
        let all: Vec<_> = packet.get_all(TLV_TYPE_UUID).collect();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].as_ref(), b"second");
    }

    #[test]
    fn test_get_int_rejects_wrong_width() {
        let mut packet = TlvPacket::new();
        packet.add_bytes(TLV_TYPE_STATUS, Bytes::from_static(b"\x01\x02"));
        assert_eq!(packet.get_int(TLV_TYPE_STATUS), None);
    }

    #[test]
    fn test_get_string_rejects_invalid_utf8() {
        let mut packet = TlvPacket::new();
        packet.add_bytes(TLV_TYPE_UUID, Bytes::from_static(b"\xff\xfe"));
        assert_eq!(packet.get_string(TLV_TYPE_UUID), None);
    }

    #[test]
    fn test_missing_field() {
        let packet = TlvPacket::new();
        assert!(packet.is_empty());
        assert_eq!(packet.get_int(TLV_TYPE_TAG), None);
        assert_eq!(packet.get_string(TLV_TYPE_UUID), None);
    }

    #[test]
    fn test_decode_empty_body() {
        let packet = TlvPacket::decode(Bytes::new()).unwrap();
        assert!(packet.is_empty());
    }

    #[test]
    fn test_decode_truncated_header() {
        let result = TlvPacket::decode(Bytes::from_static(&[0, 0, 0x4e, 0x21, 0, 0]));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Truncated field header"));
    }

    #[test]
    fn test_decode_truncated_value() {
        let mut body = Vec::new();
        body.extend_from_slice(&TLV_TYPE_STATUS.to_be_bytes());
        body.extend_from_slice(&10u32.to_be_bytes());
        body.extend_from_slice(&[1, 2, 3]);

        let result = TlvPacket::decode(Bytes::from(body));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("declares 10 bytes"));
    }

    #[test]
    fn test_try_add_int() {
        let mut packet = TlvPacket::new();
        packet.try_add_int(TLV_TYPE_STATUS, 4).unwrap();
        assert_eq!(packet.get_int(TLV_TYPE_STATUS), Some(4));
    }

    #[test]
    fn test_build_packet_frame_prefix() {
        let mut packet = TlvPacket::new();
        packet.add_string(TLV_TYPE_UUID, "hello");

        let frame = build_packet_frame(&packet).unwrap();
        let body_len = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]) as usize;

        assert_eq!(body_len, FIELD_HEADER_SIZE + 5);
        assert_eq!(frame.len(), PACKET_HEADER_SIZE + body_len);
        assert_eq!(&frame[PACKET_HEADER_SIZE..], &packet.encode()[..]);
    }

    #[test]
    fn test_build_frame_empty_packet() {
        let frame = build_packet_frame(&TlvPacket::new()).unwrap();
        assert_eq!(frame, vec![0, 0, 0, 0]);
    }
}
