//! TLV module - packet type, field encoding and stream framing.
//!
//! This module implements the binary protocol spoken with the controller:
//! - typed fields (`int32` type, `uint32` length, value)
//! - length-prefixed packet frames
//! - packet buffer for accumulating partial reads
//! - field type ids and command tag numbering

mod packet;
mod packet_buffer;
mod types;

pub use packet::{
    build_packet_frame, TlvField, TlvPacket, DEFAULT_MAX_PACKET_SIZE, FIELD_HEADER_SIZE,
    PACKET_HEADER_SIZE,
};
pub use packet_buffer::PacketBuffer;
pub use types::*;
