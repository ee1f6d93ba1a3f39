//! Frame buffer for accumulating partial reads.
//!
//! Uses `bytes::BytesMut` for zero-copy buffer management. The TLS
//! stream delivers arbitrary chunks; this buffer reassembles them and
//! yields one SLIP-delimited frame at a time (including both `END`
//! delimiters, ready for [`slip::decode`](crate::slip::decode)).
//!
//! # Example
//!
//! ```
//! use klf200::protocol::FrameBuffer;
//!
//! let mut buffer = FrameBuffer::new();
//! let frames = buffer.push(&[0xC0, 0x01, 0x02, 0xC0]).unwrap();
//! assert_eq!(frames.len(), 1);
//! assert_eq!(&frames[0][..], &[0xC0, 0x01, 0x02, 0xC0]);
//! ```

use bytes::{Bytes, BytesMut};

use crate::error::{Error, Result};
use crate::slip::END;

/// Buffer for accumulating incoming bytes and extracting SLIP frames.
///
/// A frame spans from one `END` delimiter to the next; data arriving
/// outside a frame is a hard framing error. Adjacent `END` bytes (the
/// RFC 1055 flush idiom) are skipped.
pub struct FrameBuffer {
    /// Accumulated bytes from stream reads.
    buffer: BytesMut,
}

impl FrameBuffer {
    /// Create a new empty frame buffer.
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Push data into the buffer and extract all complete SLIP frames.
    ///
    /// Returns the raw delimited chunks (each starting and ending with
    /// `END`). Partial data is kept internally for the next push.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Framing`] when bytes arrive outside a frame.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<Bytes>> {
        self.buffer.extend_from_slice(data);

        let mut frames = Vec::new();
        while let Some(frame) = self.try_extract_one()? {
            frames.push(frame);
        }
        Ok(frames)
    }

    /// Try to extract a single delimited frame from the buffer.
    fn try_extract_one(&mut self) -> Result<Option<Bytes>> {
        // Drop lone END bytes used as stream flushes.
        while self.buffer.len() >= 2 && self.buffer[0] == END && self.buffer[1] == END {
            let _ = self.buffer.split_to(1);
        }

        if self.buffer.is_empty() {
            return Ok(None);
        }
        if self.buffer[0] != END {
            return Err(Error::Framing("data outside frame"));
        }
        if self.buffer.len() < 2 {
            return Ok(None);
        }

        match self.buffer[1..].iter().position(|&b| b == END) {
            Some(pos) => {
                let frame = self.buffer.split_to(pos + 2).freeze();
                Ok(Some(frame))
            }
            None => Ok(None),
        }
    }

    /// Get the number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
