//! Packet buffer for accumulating partial reads.
//!
//! Uses `bytes::BytesMut` so packet bodies are split off without copying.
//! Parsing is a small state machine:
//! - `WaitingForHeader`: need 4 bytes of body length
//! - `WaitingForBody`: length known, need N more bytes
//!
//! # Example
//!
//! ```
//! use api_calls::tlv::{build_packet_frame, PacketBuffer, TlvPacket, TLV_TYPE_TAG};
//!
//! let mut request = TlvPacket::new();
//! request.add_int(TLV_TYPE_TAG, 21001);
//! let frame = build_packet_frame(&request).unwrap();
//!
//! let mut buffer = PacketBuffer::new();
//! assert!(buffer.push(&frame[..3]).unwrap().is_empty());
//!
//! let packets = buffer.push(&frame[3..]).unwrap();
//! assert_eq!(packets[0].get_int(TLV_TYPE_TAG), Some(21001));
//! ```

use bytes::BytesMut;

use super::packet::{TlvPacket, DEFAULT_MAX_PACKET_SIZE, PACKET_HEADER_SIZE};
use crate::error::{ApiError, Result};

#[derive(Debug, Clone, Copy)]
enum State {
    WaitingForHeader,
    WaitingForBody { remaining: u32 },
}

/// Buffer for accumulating incoming bytes and extracting complete packets.
pub struct PacketBuffer {
    buffer: BytesMut,
    state: State,
    max_packet_size: u32,
}

impl PacketBuffer {
    /// Create a new packet buffer with the default size limit (16 MB).
    pub fn new() -> Self {
        Self::with_max_packet_size(DEFAULT_MAX_PACKET_SIZE)
    }

    /// Create a new packet buffer with a custom body size limit.
    pub fn with_max_packet_size(max_packet_size: u32) -> Self {
        Self {
            buffer: BytesMut::with_capacity(8 * 1024),
            state: State::WaitingForHeader,
            max_packet_size,
        }
    }

    /// Push data into the buffer and extract all complete packets.
    ///
    /// Partial data stays buffered for the next push.
    ///
    /// # Errors
    ///
    /// Returns error if a body exceeds the size limit or a body is malformed.
    /// The stream cannot be resynchronized after an error.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<TlvPacket>> {
        self.feed(data);

        let mut packets = Vec::new();
        while let Some(packet) = self.next_packet()? {
            packets.push(packet);
        }

        Ok(packets)
    }

    /// Append data without extracting anything.
    pub fn feed(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Extract the next complete packet, if one is buffered.
    ///
    /// Packets before a malformed one are returned first; the error only
    /// surfaces once the caller reaches it.
    ///
    /// # Errors
    ///
    /// Same as [`PacketBuffer::push`].
    pub fn next_packet(&mut self) -> Result<Option<TlvPacket>> {
        loop {
            match self.state {
                State::WaitingForHeader => {
                    if self.buffer.len() < PACKET_HEADER_SIZE {
                        return Ok(None);
                    }

                    let body_len = u32::from_be_bytes([
                        self.buffer[0],
                        self.buffer[1],
                        self.buffer[2],
                        self.buffer[3],
                    ]);

                    if body_len > self.max_packet_size {
                        return Err(ApiError::Protocol(format!(
                            "Packet size {} exceeds maximum {}",
                            body_len, self.max_packet_size
                        )));
                    }

                    let _ = self.buffer.split_to(PACKET_HEADER_SIZE);
                    self.state = State::WaitingForBody {
                        remaining: body_len,
                    };
                }

                State::WaitingForBody { remaining } => {
                    let remaining = remaining as usize;
                    if self.buffer.len() < remaining {
                        return Ok(None);
                    }

                    let body = self.buffer.split_to(remaining).freeze();
                    self.state = State::WaitingForHeader;

                    return TlvPacket::decode(body).map(Some);
                }
            }
        }
    }

    /// Number of buffered bytes not yet consumed.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer and reset state.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.state = State::WaitingForHeader;
    }
}

impl Default for PacketBuffer {
    fn default() -> Self {
        Self::new()
    }
}
