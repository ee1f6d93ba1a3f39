//! Observable event surface.
//!
//! Everything the engine does is mirrored onto a broadcast channel:
//! lifecycle transitions, raw bytes in both directions, requests and
//! their results, decoded notifications, and asynchronous errors.
//! Subscribers receive read-only copies; emission never blocks the
//! engine and silently drops events when nobody listens.
//!
//! # Example
//!
//! ```ignore
//! let mut events = connection.subscribe();
//! while let Ok(event) = events.recv().await {
//!     if let Event::Notification(ntf) = event {
//!         println!("{}: {:?}", ntf.name, ntf.payload);
//!     }
//! }
//! ```

use std::net::SocketAddr;

use bytes::Bytes;
use tokio::sync::broadcast;

use crate::commands::types::CommandData;
use crate::session::RequestInfo;

/// Channel capacity; a slow subscriber loses the oldest events.
const CHANNEL_CAPACITY: usize = 64;

/// The remote end of a connection.
#[derive(Debug, Clone)]
pub struct Peer {
    /// Hostname or address the connection was opened against.
    pub host: String,
    /// Resolved socket address, absent for non-network streams.
    pub addr: Option<SocketAddr>,
    /// SHA-256 fingerprint of the peer certificate, colon-separated
    /// hex. Absent for non-TLS streams.
    pub fingerprint: Option<String>,
}

/// A decoded (or raw) inbound frame surfaced to observers.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Numeric command id.
    pub command: u16,
    /// Registry command name.
    pub name: &'static str,
    /// Raw payload bytes.
    pub bytes: Bytes,
    /// Structured payload, when the command has a decoder.
    pub payload: Option<CommandData>,
    /// The originating request, when known.
    pub req: Option<RequestInfo>,
}

/// One observable engine event.
#[derive(Debug, Clone)]
pub enum Event {
    /// TLS connect initiated.
    Connecting { host: String },
    /// Transport established and peer identified.
    Connected { peer: Peer },
    /// Connection torn down.
    Disconnected { peer: Peer },
    /// Raw bytes written to the stream (SLIP encoded).
    Send { bytes: Bytes },
    /// Raw bytes read from the stream.
    Data { bytes: Bytes },
    /// A request was registered and written.
    Request { req: RequestInfo },
    /// A request completed with its decoded result.
    Response {
        req: RequestInfo,
        result: Option<CommandData>,
    },
    /// An inbound confirmation or notification frame.
    Notification(Notification),
    /// An asynchronous or request-scoped error.
    Error {
        message: String,
        req: Option<RequestInfo>,
    },
}

/// Broadcast fan-out for engine events.
#[derive(Clone)]
pub(crate) struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Emit one event; a missing subscriber is not an error.
    pub fn emit(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    /// Emit an error event.
    pub fn emit_error(&self, message: impl Into<String>, req: Option<RequestInfo>) {
        self.emit(Event::Error {
            message: message.into(),
            req,
        });
    }
}
