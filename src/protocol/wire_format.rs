//! Wire format encoding and decoding.
//!
//! Implements the KLF 200 transport frame (inside the SLIP envelope):
//! ```text
//! ┌──────────┬────────┬────────────┬──────────┬──────────┐
//! │ Protocol │ Length │ Command ID │ Payload  │ Checksum │
//! │ 1 byte   │ 1 byte │ 2 bytes BE │ ≤250 B   │ 1 byte   │
//! │ always 0 │ |p|+3  │            │          │ XOR      │
//! └──────────┴────────┴────────────┴──────────┴──────────┘
//! ```
//!
//! The length byte counts the command id, the payload, and the checksum.
//! The checksum is the XOR of every byte before the checksum byte.

use bytes::Bytes;

use super::Frame;
use crate::error::{Error, Result};

/// Protocol identifier byte (the KLF 200 only speaks protocol 0).
pub const PROTOCOL_ID: u8 = 0x00;

/// Maximum payload size per frame.
pub const MAX_PAYLOAD: usize = 250;

/// XOR checksum over a byte slice.
#[inline]
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}

/// Encode a command id and payload into a transport frame.
///
/// # Example
///
/// ```
/// use klf200::protocol::encode_frame;
///
/// let frame = encode_frame(0x000A, &[]).unwrap();
/// assert_eq!(frame, [0x00, 0x03, 0x00, 0x0A, 0x09]);
/// ```
pub fn encode_frame(command: u16, payload: &[u8]) -> Result<Vec<u8>> {
    if payload.len() > MAX_PAYLOAD {
        return Err(Error::PayloadTooLong(payload.len()));
    }

    let mut buf = Vec::with_capacity(payload.len() + 5);
    buf.push(PROTOCOL_ID);
    buf.push((payload.len() + 3) as u8);
    buf.extend_from_slice(&command.to_be_bytes());
    buf.extend_from_slice(payload);
    buf.push(checksum(&buf));
    Ok(buf)
}

/// Decode a transport frame into a [`Frame`].
///
/// A frame whose first byte is not [`PROTOCOL_ID`] is rejected. A
/// checksum mismatch is logged and tolerated (some gateway firmware
/// revisions emit frames with bad checksums) unless `strict` is set, in
/// which case the frame is rejected.
pub fn decode_frame(bytes: &[u8], strict: bool) -> Result<Frame> {
    if bytes.is_empty() {
        return Err(Error::Framing("empty frame"));
    }
    if bytes[0] != PROTOCOL_ID {
        return Err(Error::UnknownProtocol(bytes[0]));
    }
    if bytes.len() < 5 {
        return Err(Error::Framing("frame shorter than minimum length"));
    }

    let declared = bytes[1] as usize;
    if bytes.len() != declared + 2 {
        return Err(Error::Framing("frame length does not match length byte"));
    }

    let expected = checksum(&bytes[..bytes.len() - 1]);
    let actual = bytes[bytes.len() - 1];
    if expected != actual {
        if strict {
            return Err(Error::ChecksumMismatch { expected, actual });
        }
        tracing::warn!(
            "checksum mismatch (expected 0x{expected:02X}, got 0x{actual:02X}), processing frame anyway"
        );
    }

    let command = u16::from_be_bytes([bytes[2], bytes[3]]);
    let payload = Bytes::copy_from_slice(&bytes[4..bytes.len() - 1]);
    Ok(Frame::new(command, payload))
}
