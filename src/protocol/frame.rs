//! Frame struct with typed accessors.
//!
//! Represents one decoded transport frame: a 16-bit command id and its
//! payload. Uses `bytes::Bytes` for zero-copy payload sharing.

use bytes::Bytes;

/// A complete decoded protocol frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// 16-bit command id.
    pub command: u16,
    /// Payload bytes (zero-copy via `bytes::Bytes`).
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame from command id and payload.
    pub fn new(command: u16, payload: Bytes) -> Self {
        Self { command, payload }
    }

    /// Create a frame from a command id and raw bytes (copies data).
    pub fn from_parts(command: u16, payload: &[u8]) -> Self {
        Self {
            command,
            payload: Bytes::copy_from_slice(payload),
        }
    }

    /// Get the command id.
    #[inline]
    pub fn command(&self) -> u16 {
        self.command
    }

    /// Get a reference to the payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Get a clone of the payload as `Bytes` (cheap, zero-copy).
    #[inline]
    pub fn payload_bytes(&self) -> Bytes {
        self.payload.clone()
    }
}
