//! SLIP framing (RFC 1055).
//!
//! The KLF 200 wraps every protocol frame in SLIP on the TLS stream:
//! a frame is `END, stuffed bytes…, END`, where `END` occurring inside
//! the payload is replaced by `ESC, ESC_END` and `ESC` by `ESC, ESC_ESC`.
//!
//! Both directions are pure functions over byte buffers; splitting a
//! stream into individual frames is the job of
//! [`FrameBuffer`](crate::protocol::FrameBuffer).
//!
//! # Example
//!
//! ```
//! use klf200::slip;
//!
//! let encoded = slip::encode(&[0x00, 0xC0, 0x01]);
//! assert_eq!(encoded, [0xC0, 0x00, 0xDB, 0xDC, 0x01, 0xC0]);
//! assert_eq!(slip::decode(&encoded).unwrap(), [0x00, 0xC0, 0x01]);
//! ```

use crate::error::{Error, Result};

/// Frame delimiter.
pub const END: u8 = 0xC0;
/// Escape marker.
pub const ESC: u8 = 0xDB;
/// Escaped `END` byte.
pub const ESC_END: u8 = 0xDC;
/// Escaped `ESC` byte.
pub const ESC_ESC: u8 = 0xDD;

/// Encode one logical frame into its SLIP representation.
///
/// The result starts and ends with [`END`]; `END` and `ESC` bytes inside
/// the payload are stuffed.
pub fn encode(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 2);
    out.push(END);
    for &byte in payload {
        match byte {
            END => {
                out.push(ESC);
                out.push(ESC_END);
            }
            ESC => {
                out.push(ESC);
                out.push(ESC_ESC);
            }
            other => out.push(other),
        }
    }
    out.push(END);
    out
}

/// Decode exactly one SLIP frame back into its payload.
///
/// The input must start and end with [`END`]. Any interior `END`, any
/// `ESC` not followed by `ESC_END`/`ESC_ESC`, or a missing outer
/// delimiter is a framing error. The input is not modified; the payload
/// is written to a fresh buffer no larger than the input.
pub fn decode(frame: &[u8]) -> Result<Vec<u8>> {
    if frame.len() < 2 || frame[0] != END || frame[frame.len() - 1] != END {
        return Err(Error::Framing("frame must be delimited by END bytes"));
    }

    let interior = &frame[1..frame.len() - 1];
    let mut out = Vec::with_capacity(interior.len());
    let mut iter = interior.iter();

    while let Some(&byte) = iter.next() {
        match byte {
            END => return Err(Error::Framing("unescaped END inside frame")),
            ESC => match iter.next() {
                Some(&ESC_END) => out.push(END),
                Some(&ESC_ESC) => out.push(ESC),
                _ => return Err(Error::Framing("invalid escape sequence")),
            },
            other => out.push(other),
        }
    }

    Ok(out)
}
