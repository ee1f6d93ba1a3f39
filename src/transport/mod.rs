//! Transport module - the TLS byte stream to the gateway.
//!
//! The engine itself only needs a bidirectional byte stream; this
//! module provides the production one (TCP + TLS with certificate
//! verification disabled, fingerprint captured) and the trait alias
//! tests use to substitute an in-memory stream.

mod tls;

use tokio::io::{AsyncRead, AsyncWrite};

pub use tls::{connect, TlsConnection};

/// Any bidirectional byte stream the engine can drive.
pub trait ByteStream: AsyncRead + AsyncWrite + Send + Unpin + 'static {}

impl<S> ByteStream for S where S: AsyncRead + AsyncWrite + Send + Unpin + 'static {}
