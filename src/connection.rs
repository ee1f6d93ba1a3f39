//! Connection lifecycle, request pipeline, and frame dispatcher.
//!
//! The [`Connection`] owns one TLS (or test) byte stream and manages
//! the lifecycle:
//! 1. Open the transport and split it into reader and writer
//! 2. Spawn the read/dispatch loop
//! 3. Authenticate with the gateway password
//! 4. Serialize requests onto the wire and correlate the replies
//!
//! # Example
//!
//! ```ignore
//! use klf200::{Config, Connection};
//!
//! #[tokio::main]
//! async fn main() -> klf200::Result<()> {
//!     let config = Config::new("192.168.1.20", "velux123");
//!     let connection = Connection::connect(config).await?;
//!
//!     let version = connection.get_version().await?;
//!     println!("{version:?}");
//!
//!     connection.disconnect().await;
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use bytes::Bytes;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{broadcast, oneshot, Mutex as AsyncMutex};
use tokio::task::JoinHandle;

use crate::commands::registry::{self, CommandDescriptor, Role};
use crate::commands::types::{CommandData, GatewayState, ProtocolVersion, VersionInfo};
use crate::commands::ERROR_NTF;
use crate::error::{Error, GatewayError, Result};
use crate::events::{Event, EventBus, Notification, Peer};
use crate::protocol::{decode_frame, encode_frame, Frame, FrameBuffer};
use crate::session::{Accumulator, RequestInfo, SessionKey, SessionSlot};
use crate::slip;
use crate::transport::{self, ByteStream};

/// Default gateway TLS port.
pub const DEFAULT_PORT: u16 = 51200;

/// Default wait for a confirmation frame.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Default wait for a notification stream to terminate.
pub const DEFAULT_STREAM_TIMEOUT: Duration = Duration::from_secs(60);

/// Back-off while another transaction holds the same session key.
const SESSION_BUSY_BACKOFF: Duration = Duration::from_millis(100);

/// Connection configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gateway hostname or address.
    pub host: String,
    /// Gateway TLS port.
    pub port: u16,
    /// Gateway password (the printed label value by default).
    pub password: String,
    /// How long to wait for a confirmation frame.
    pub confirmation_timeout: Duration,
    /// How long to wait for a notification stream to terminate.
    pub stream_timeout: Duration,
    /// Reject frames with bad checksums instead of tolerating them.
    pub strict_checksums: bool,
}

impl Config {
    /// Create a configuration with default port and timeouts.
    pub fn new(host: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            password: password.into(),
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
            stream_timeout: DEFAULT_STREAM_TIMEOUT,
            strict_checksums: false,
        }
    }

    /// Override the gateway port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Override the confirmation timeout.
    pub fn confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    /// Override the stream completion timeout.
    pub fn stream_timeout(mut self, timeout: Duration) -> Self {
        self.stream_timeout = timeout;
        self
    }

    /// Reject frames whose checksum does not match.
    pub fn strict_checksums(mut self, strict: bool) -> Self {
        self.strict_checksums = strict;
        self
    }
}

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Disconnected,
    Connecting,
    Authenticating,
    Authenticated,
}

/// Session table plus the counters it guards.
///
/// One lock covers the whole register/dispatch critical section so a
/// confirmation can never be routed before its request is registered.
struct Engine {
    sessions: HashMap<SessionKey, SessionSlot>,
    last_request_id: u32,
    last_session_id: u16,
    state: State,
}

/// State shared between the connection handle and the read task.
struct Shared {
    engine: StdMutex<Engine>,
    /// At most one caller is in the writing phase at a time.
    send_lock: AsyncMutex<()>,
    writer: AsyncMutex<Option<Box<dyn AsyncWrite + Send + Unpin>>>,
    events: EventBus,
    config: Config,
    peer: Peer,
    read_task: StdMutex<Option<JoinHandle<()>>>,
}

/// How a failed request should be reported.
enum Failure {
    /// The request never made it into the session table.
    Early(Error),
    /// The request was in flight; carries its identity for attribution.
    InFlight(RequestInfo, Error),
}

impl Failure {
    fn into_parts(self) -> (Option<RequestInfo>, Error) {
        match self {
            Failure::Early(err) => (None, err),
            Failure::InFlight(req, err) => (Some(req), err),
        }
    }
}

/// A connection to one KLF 200 gateway.
///
/// Cheap to clone; all clones drive the same underlying stream.
#[derive(Clone)]
pub struct Connection {
    shared: Arc<Shared>,
}

impl Connection {
    /// Connect to the gateway over TLS and authenticate.
    ///
    /// Authentication failure and transport loss during bring-up are
    /// fatal and propagate to the caller.
    pub async fn connect(config: Config) -> Result<Connection> {
        let events = EventBus::new();
        events.emit(Event::Connecting {
            host: config.host.clone(),
        });

        let tls = transport::connect(&config.host, config.port).await?;
        let peer = Peer {
            host: config.host.clone(),
            addr: Some(tls.addr),
            fingerprint: Some(tls.fingerprint),
        };

        let connection = Self::from_parts(tls.stream, config, peer, events);
        connection.shared.events.emit(Event::Connected {
            peer: connection.shared.peer.clone(),
        });

        connection.authenticate().await?;
        Ok(connection)
    }

    /// Drive an already-established byte stream (the abstract interface
    /// used to impersonate a gateway in tests).
    ///
    /// No authentication is performed; call [`Connection::authenticate`]
    /// when the peer expects the password handshake.
    pub fn open<S: ByteStream>(stream: S, config: Config) -> Connection {
        let peer = Peer {
            host: config.host.clone(),
            addr: None,
            fingerprint: None,
        };
        Self::from_parts(stream, config, peer, EventBus::new())
    }

    fn from_parts<S: ByteStream>(
        stream: S,
        config: Config,
        peer: Peer,
        events: EventBus,
    ) -> Connection {
        let (reader, writer) = tokio::io::split(stream);

        let shared = Arc::new(Shared {
            engine: StdMutex::new(Engine {
                sessions: HashMap::new(),
                last_request_id: 0,
                last_session_id: 0,
                state: State::Connecting,
            }),
            send_lock: AsyncMutex::new(()),
            writer: AsyncMutex::new(Some(Box::new(writer) as Box<dyn AsyncWrite + Send + Unpin>)),
            events,
            config,
            peer,
            read_task: StdMutex::new(None),
        });

        let task = tokio::spawn(Self::read_loop(reader, shared.clone()));
        *shared.read_task.lock().unwrap() = Some(task);

        Connection { shared }
    }

    /// Run the password handshake.
    pub async fn authenticate(&self) -> Result<()> {
        self.set_state(State::Authenticating);

        let password = self.shared.config.password.clone();
        let params = serde_json::json!({ "password": password });

        match self.execute("GW_PASSWORD_ENTER_REQ", params).await {
            Ok(_) => {
                self.set_state(State::Authenticated);
                Ok(())
            }
            Err(failure) => {
                let (_, err) = failure.into_parts();
                self.disconnect().await;
                Err(err)
            }
        }
    }

    /// Execute a request by registry name.
    ///
    /// On success, returns the decoded confirmation result or the
    /// accumulated notification stream. Every error except an
    /// authentication failure is surfaced on the event channel and
    /// yields `Ok(None)`, keeping the connection usable.
    pub async fn request(&self, name: &str, params: Value) -> Result<Option<CommandData>> {
        match self.execute(name, params).await {
            Ok(result) => Ok(result),
            Err(failure) => {
                let (req, err) = failure.into_parts();
                if matches!(err, Error::AuthenticationFailed) {
                    return Err(err);
                }
                tracing::debug!(error = %err, "request failed");
                self.shared.events.emit_error(err.to_string(), req);
                Ok(None)
            }
        }
    }

    /// Fetch the gateway software version.
    pub async fn get_version(&self) -> Result<Option<VersionInfo>> {
        let result = self.request("GW_GET_VERSION_REQ", Value::Null).await?;
        Ok(result.and_then(|data| match data {
            CommandData::Version(version) => Some(version),
            _ => None,
        }))
    }

    /// Fetch the protocol version.
    pub async fn get_protocol_version(&self) -> Result<Option<ProtocolVersion>> {
        let result = self
            .request("GW_GET_PROTOCOL_VERSION_REQ", Value::Null)
            .await?;
        Ok(result.and_then(|data| match data {
            CommandData::ProtocolVersion(version) => Some(version),
            _ => None,
        }))
    }

    /// Fetch the gateway state.
    pub async fn get_state(&self) -> Result<Option<GatewayState>> {
        let result = self.request("GW_GET_STATE_REQ", Value::Null).await?;
        Ok(result.and_then(|data| match data {
            CommandData::State(state) => Some(state),
            _ => None,
        }))
    }

    /// Subscribe to the event surface.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.shared.events.subscribe()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> State {
        self.shared.engine.lock().unwrap().state
    }

    /// The peer this connection talks to.
    pub fn peer(&self) -> &Peer {
        &self.shared.peer
    }

    /// SHA-256 fingerprint of the peer certificate, when TLS is in use.
    pub fn fingerprint(&self) -> Option<&str> {
        self.shared.peer.fingerprint.as_deref()
    }

    /// Number of requests currently in flight.
    pub fn outstanding_requests(&self) -> usize {
        self.shared.engine.lock().unwrap().sessions.len()
    }

    /// Tear the connection down, failing all outstanding requests.
    pub async fn disconnect(&self) {
        Self::teardown(&self.shared).await;
        let task = self.shared.read_task.lock().unwrap().take();
        if let Some(task) = task {
            task.abort();
        }
    }

    fn set_state(&self, state: State) {
        self.shared.engine.lock().unwrap().state = state;
    }

    // --- request pipeline -------------------------------------------------

    async fn execute(
        &self,
        name: &str,
        params: Value,
    ) -> std::result::Result<Option<CommandData>, Failure> {
        let shared = &self.shared;

        let desc = registry::by_name(name)
            .ok_or_else(|| Failure::Early(Error::UnknownCommand(name.to_string())))?;
        if desc.role != Role::Request {
            return Err(Failure::Early(Error::NotARequest(desc.name)));
        }
        let encode = desc
            .encode
            .ok_or(Failure::Early(Error::NoEncoder(desc.name)))?;

        // Allocate identifiers under the engine lock.
        let (request_id, session_id) = {
            let mut engine = shared.engine.lock().unwrap();
            if engine.state == State::Disconnected {
                return Err(Failure::Early(Error::Disconnected));
            }
            engine.last_request_id = engine.last_request_id.wrapping_add(1);
            let session_id = desc.carries_session.then(|| {
                engine.last_session_id = engine.last_session_id.wrapping_add(1);
                engine.last_session_id
            });
            (engine.last_request_id, session_id)
        };

        let req = RequestInfo {
            id: request_id,
            command: desc.id,
            name: desc.name,
            session_id,
        };

        let payload =
            encode(&params, session_id).map_err(|e| Failure::InFlight(req.clone(), e))?;

        let key = match session_id {
            Some(sid) => SessionKey::Session(sid),
            None => SessionKey::Command(desc.id),
        };

        // Writing phase: one caller at a time.
        let send_guard = shared.send_lock.lock().await;

        // Wait until no transaction with the same key is live, then
        // register ours.
        let (cfm_rx, done_rx) = loop {
            {
                let mut engine = shared.engine.lock().unwrap();
                if engine.state == State::Disconnected {
                    return Err(Failure::InFlight(req, Error::Disconnected));
                }
                if !engine.sessions.contains_key(&key) {
                    let (cfm_tx, cfm_rx) = oneshot::channel();
                    let (done_tx, done_rx) = oneshot::channel();
                    engine.sessions.insert(
                        key,
                        SessionSlot {
                            req: req.clone(),
                            descriptor: desc,
                            acc: Accumulator::new(),
                            cfm_tx: Some(cfm_tx),
                            done_tx: Some(done_tx),
                        },
                    );
                    break (cfm_rx, done_rx);
                }
            }
            tracing::debug!(key = %key, "session key busy, backing off");
            tokio::time::sleep(SESSION_BUSY_BACKOFF).await;
        };

        shared.events.emit(Event::Request { req: req.clone() });

        let write_result: Result<Bytes> = async {
            let frame = encode_frame(desc.id, &payload)?;
            let encoded = Bytes::from(slip::encode(&frame));
            let mut writer_guard = shared.writer.lock().await;
            let writer = writer_guard.as_mut().ok_or(Error::Disconnected)?;
            writer.write_all(&encoded).await?;
            writer.flush().await?;
            Ok(encoded)
        }
        .await;
        drop(send_guard);

        match write_result {
            Ok(bytes) => shared.events.emit(Event::Send { bytes }),
            Err(err) => {
                shared.engine.lock().unwrap().sessions.remove(&key);
                return Err(Failure::InFlight(req, err));
            }
        }

        // Await the confirmation, then the terminator for streams.
        if desc.spawns_stream {
            match tokio::time::timeout(shared.config.confirmation_timeout, cfm_rx).await {
                Err(_) => {
                    shared.engine.lock().unwrap().sessions.remove(&key);
                    return Err(Failure::InFlight(req, Error::ConfirmationTimeout));
                }
                // A closed channel means the dispatcher already
                // resolved the slot; the outcome is waiting below.
                Ok(_) => {}
            }
            match tokio::time::timeout(shared.config.stream_timeout, done_rx).await {
                Err(_) => {
                    shared.engine.lock().unwrap().sessions.remove(&key);
                    Err(Failure::InFlight(req, Error::StreamTimeout))
                }
                Ok(Ok(outcome)) => outcome.map_err(|e| Failure::InFlight(req, e)),
                Ok(Err(_)) => Err(Failure::InFlight(req, Error::Disconnected)),
            }
        } else {
            match tokio::time::timeout(shared.config.confirmation_timeout, done_rx).await {
                Err(_) => {
                    shared.engine.lock().unwrap().sessions.remove(&key);
                    Err(Failure::InFlight(req, Error::ConfirmationTimeout))
                }
                Ok(Ok(outcome)) => outcome.map_err(|e| Failure::InFlight(req, e)),
                Ok(Err(_)) => Err(Failure::InFlight(req, Error::Disconnected)),
            }
        }
    }

    // --- inbound path -----------------------------------------------------

    /// Main read loop: reassemble SLIP frames and dispatch them.
    async fn read_loop<R: AsyncRead + Unpin>(mut reader: R, shared: Arc<Shared>) {
        let mut frame_buffer = FrameBuffer::new();
        let mut buf = vec![0u8; 4096];

        loop {
            let n = match reader.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => n,
                Err(err) => {
                    shared.events.emit_error(format!("read failed: {err}"), None);
                    break;
                }
            };

            shared.events.emit(Event::Data {
                bytes: Bytes::copy_from_slice(&buf[..n]),
            });

            let chunks = match frame_buffer.push(&buf[..n]) {
                Ok(chunks) => chunks,
                Err(err) => {
                    // Drop the garbled window and resynchronize on the
                    // next END delimiter.
                    shared.events.emit_error(err.to_string(), None);
                    frame_buffer.clear();
                    continue;
                }
            };

            for chunk in chunks {
                let decoded = match slip::decode(&chunk) {
                    Ok(decoded) => decoded,
                    Err(err) => {
                        shared.events.emit_error(err.to_string(), None);
                        continue;
                    }
                };
                match decode_frame(&decoded, shared.config.strict_checksums) {
                    Ok(frame) => Self::dispatch_frame(&shared, frame),
                    Err(err) => shared.events.emit_error(err.to_string(), None),
                }
            }
        }

        Self::teardown(&shared).await;
    }

    /// Route one decoded frame to its owning session.
    fn dispatch_frame(shared: &Shared, frame: Frame) {
        let Some(desc) = registry::by_id(frame.command()) else {
            shared
                .events
                .emit_error(Error::UnknownCommandId(frame.command()).to_string(), None);
            return;
        };

        if desc.id == ERROR_NTF {
            Self::handle_error_ntf(shared, desc, &frame);
            return;
        }

        if desc.role == Role::Request {
            shared
                .events
                .emit_error(Error::UnexpectedRole(desc.name).to_string(), None);
            return;
        }

        // Broadcast notifications have no owning request.
        let Some(req_id) = desc.req else {
            let payload = desc.decode.and_then(|decode| {
                let mut scratch = Accumulator::new();
                match decode(frame.payload(), &mut scratch) {
                    Ok(value) => value,
                    Err(err) => {
                        shared.events.emit_error(err.to_string(), None);
                        None
                    }
                }
            });
            shared.events.emit(Event::Notification(Notification {
                command: desc.id,
                name: desc.name,
                bytes: frame.payload_bytes(),
                payload,
                req: None,
            }));
            return;
        };

        let Some(req_desc) = registry::by_id(req_id) else {
            shared
                .events
                .emit_error(Error::UnknownCommandId(req_id).to_string(), None);
            return;
        };

        let key = if req_desc.carries_session {
            let offset = desc.session_offset;
            if frame.payload().len() < offset + 2 {
                shared.events.emit_error(
                    Error::PayloadLength {
                        name: desc.name,
                        expected: offset + 2,
                        actual: frame.payload().len(),
                    }
                    .to_string(),
                    None,
                );
                return;
            }
            SessionKey::Session(u16::from_be_bytes([
                frame.payload()[offset],
                frame.payload()[offset + 1],
            ]))
        } else {
            SessionKey::Command(req_id)
        };

        let mut engine = shared.engine.lock().unwrap();

        if !engine.sessions.contains_key(&key) {
            drop(engine);
            // Reply without an owner: surface raw and drop it.
            tracing::debug!(name = desc.name, key = %key, "reply without owning session");
            shared.events.emit(Event::Notification(Notification {
                command: desc.id,
                name: desc.name,
                bytes: frame.payload_bytes(),
                payload: None,
                req: None,
            }));
            return;
        }

        let slot = engine.sessions.get_mut(&key).expect("slot checked above");
        let req = slot.req.clone();
        let spawns_stream = slot.descriptor.spawns_stream;

        let decoded = match desc.decode {
            Some(decode) => match decode(frame.payload(), &mut slot.acc) {
                Ok(value) => value,
                Err(err) => {
                    // Domain error: fail the session, keep the
                    // connection up. The awaiting caller reports it.
                    let slot = engine.sessions.remove(&key).expect("slot checked above");
                    drop(engine);
                    slot.resolve(Err(err));
                    return;
                }
            },
            None => None,
        };

        let complete = match desc.role {
            Role::Confirmation => {
                slot.confirm();
                !spawns_stream
            }
            Role::Notification => desc.is_session_terminator || slot.acc.is_finished(),
            Role::Request => unreachable!("requests rejected above"),
        };

        if complete {
            let SessionSlot { acc, done_tx, .. } =
                engine.sessions.remove(&key).expect("slot checked above");
            drop(engine);

            shared.events.emit(Event::Notification(Notification {
                command: desc.id,
                name: desc.name,
                bytes: frame.payload_bytes(),
                payload: decoded,
                req: Some(req.clone()),
            }));

            let outcome = acc.into_outcome(spawns_stream);
            shared.events.emit(Event::Response {
                req,
                result: outcome.clone(),
            });
            if let Some(done_tx) = done_tx {
                let _ = done_tx.send(Ok(outcome));
            }
        } else {
            drop(engine);
            shared.events.emit(Event::Notification(Notification {
                command: desc.id,
                name: desc.name,
                bytes: frame.payload_bytes(),
                payload: decoded,
                req: Some(req),
            }));
        }
    }

    /// `GW_ERROR_NTF`: attribute the error to the most recent
    /// outstanding request, failing it, or surface it unattributed.
    fn handle_error_ntf(shared: &Shared, desc: &'static CommandDescriptor, frame: &Frame) {
        let code = frame.payload().first().copied().unwrap_or(0);
        let gateway_error = GatewayError::from_code(code);

        let victim = {
            let mut engine = shared.engine.lock().unwrap();
            let key = engine
                .sessions
                .iter()
                .max_by_key(|(_, slot)| slot.req.id)
                .map(|(key, _)| *key);
            key.and_then(|key| engine.sessions.remove(&key))
        };

        match victim {
            Some(slot) => {
                let req = slot.req.clone();
                shared.events.emit(Event::Notification(Notification {
                    command: desc.id,
                    name: desc.name,
                    bytes: frame.payload_bytes(),
                    payload: None,
                    req: Some(req),
                }));
                slot.resolve(Err(Error::Gateway(gateway_error)));
            }
            None => {
                shared.events.emit(Event::Notification(Notification {
                    command: desc.id,
                    name: desc.name,
                    bytes: frame.payload_bytes(),
                    payload: None,
                    req: None,
                }));
                shared
                    .events
                    .emit_error(Error::Gateway(gateway_error).to_string(), None);
            }
        }
    }

    /// Fail all outstanding sessions and close the writer. Idempotent.
    async fn teardown(shared: &Arc<Shared>) {
        let slots: Vec<SessionSlot> = {
            let mut engine = shared.engine.lock().unwrap();
            if engine.state == State::Disconnected {
                return;
            }
            engine.state = State::Disconnected;
            engine.sessions.drain().map(|(_, slot)| slot).collect()
        };

        for slot in slots {
            slot.resolve(Err(Error::Disconnected));
        }

        if let Some(mut writer) = shared.writer.lock().await.take() {
            let _ = writer.shutdown().await;
        }

        shared.events.emit(Event::Disconnected {
            peer: shared.peer.clone(),
        });
    }
}
