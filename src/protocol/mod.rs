//! Protocol module - wire format, framing, and frame types.
//!
//! This module implements the KLF 200 transport frame:
//! - frame encoding/decoding with XOR checksum
//! - frame buffer for splitting the SLIP byte stream on partial reads
//! - [`Frame`] struct with typed accessors

mod frame;
mod frame_buffer;
mod wire_format;

pub use frame::Frame;
pub use frame_buffer::FrameBuffer;
pub use wire_format::{checksum, decode_frame, encode_frame, MAX_PAYLOAD, PROTOCOL_ID};
