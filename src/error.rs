//! Error types for the KLF 200 client.

use thiserror::Error;

/// Main error type for all gateway operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error on the underlying byte stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS setup or handshake error.
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    /// The configured gateway address could not be used.
    #[error("invalid gateway address: {0}")]
    Address(String),

    /// SLIP-level framing violation (bad delimiters or escape pairs).
    #[error("framing error: {0}")]
    Framing(&'static str),

    /// Frame did not start with the KLF protocol byte (0x00).
    #[error("unknown protocol byte 0x{0:02X}")]
    UnknownProtocol(u8),

    /// Frame checksum did not match (strict mode only).
    #[error("checksum mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    /// Received a command id that is not in the registry.
    #[error("unknown command id 0x{0:04X}")]
    UnknownCommandId(u16),

    /// Requested a command name that is not in the registry.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Tried to send a command whose role is not `Request`.
    #[error("{0} is not a request")]
    NotARequest(&'static str),

    /// A request-role command id arrived inbound.
    #[error("unexpected inbound request {0}")]
    UnexpectedRole(&'static str),

    /// The command is registered without a payload encoder.
    #[error("{0} has no payload encoder")]
    NoEncoder(&'static str),

    /// Encoded payload exceeds the 250-byte frame limit.
    #[error("payload too long: {0} bytes (max 250)")]
    PayloadTooLong(usize),

    /// Inbound payload did not match the decoder's declared size.
    #[error("payload length mismatch for {name}: expected {expected} bytes, got {actual}")]
    PayloadLength {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Request parameters could not be interpreted by the encoder.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// The gateway reported a domain error.
    #[error("gateway error: {0}")]
    Gateway(GatewayError),

    /// The password was rejected during the authentication handshake.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// No confirmation arrived within the confirmation timeout.
    #[error("timed out waiting for confirmation")]
    ConfirmationTimeout,

    /// A notification stream did not terminate within the stream timeout.
    #[error("timed out waiting for end of session")]
    StreamTimeout,

    /// The connection is (or became) closed.
    #[error("disconnected")]
    Disconnected,
}

/// Status codes reported by the gateway, either through `GW_ERROR_NTF`
/// or through command-specific confirmation status bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Status 0: unspecified error.
    #[error("unspecified error")]
    Unspecified,
    /// Status 1: the command is unknown to the gateway.
    #[error("invalid command")]
    InvalidCommand,
    /// Status 2: the frame structure was rejected.
    #[error("invalid frame")]
    InvalidFrame,
    /// Status 7: the gateway is busy, try again later.
    #[error("gateway busy")]
    Busy,
    /// Status 8: the addressed node does not exist.
    #[error("invalid node")]
    InvalidNode,
    /// Status 12: the connection is not authenticated.
    #[error("not authenticated")]
    NotAuthenticated,
    /// The supplied password was wrong.
    #[error("invalid password")]
    InvalidPassword,
    /// The requested node id is out of range or unused.
    #[error("invalid node id")]
    InvalidNodeId,
    /// The gateway's system table holds no actuators.
    #[error("system table empty")]
    EmptySystemTable,
    /// The session slot is already occupied on the gateway side.
    #[error("session already in use")]
    SessionInUse,
    /// The requested group type is not valid for this operation.
    #[error("invalid group type")]
    InvalidGroupType,
    /// A parameter value was rejected.
    #[error("invalid parameter")]
    InvalidParameter,
    /// The gateway rejected the request without further detail.
    #[error("request failed")]
    RequestFailed,
    /// A status code not covered by the specification.
    #[error("unknown status code {0}")]
    Unknown(u8),
}

impl GatewayError {
    /// Map a `GW_ERROR_NTF` code to its error kind.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => GatewayError::Unspecified,
            1 => GatewayError::InvalidCommand,
            2 => GatewayError::InvalidFrame,
            7 => GatewayError::Busy,
            8 => GatewayError::InvalidNode,
            12 => GatewayError::NotAuthenticated,
            other => GatewayError::Unknown(other),
        }
    }
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_codes() {
        assert_eq!(GatewayError::from_code(0), GatewayError::Unspecified);
        assert_eq!(GatewayError::from_code(1), GatewayError::InvalidCommand);
        assert_eq!(GatewayError::from_code(2), GatewayError::InvalidFrame);
        assert_eq!(GatewayError::from_code(7), GatewayError::Busy);
        assert_eq!(GatewayError::from_code(8), GatewayError::InvalidNode);
        assert_eq!(GatewayError::from_code(12), GatewayError::NotAuthenticated);
        assert_eq!(GatewayError::from_code(99), GatewayError::Unknown(99));
    }

    #[test]
    fn test_error_display() {
        let err = Error::UnknownCommandId(0x4711);
        assert_eq!(err.to_string(), "unknown command id 0x4711");

        let err = Error::Gateway(GatewayError::Busy);
        assert_eq!(err.to_string(), "gateway error: gateway busy");
    }
}
