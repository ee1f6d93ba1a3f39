//! Command registry: the static catalogue of every known command.
//!
//! The registry is consulted three ways: by name (the request API), by
//! numeric id (reverse lookup on receive), and for structural flags
//! that drive the session machinery (`carries_session`,
//! `spawns_stream`, `is_session_terminator`).
//!
//! # Example
//!
//! ```
//! use klf200::commands::registry;
//!
//! let cmd = registry::by_name("GW_GET_PROTOCOL_VERSION_REQ").unwrap();
//! assert_eq!(cmd.id, 0x000A);
//! assert_eq!(registry::by_id(0x000B).unwrap().req, Some(0x000A));
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use serde_json::Value;

use super::table::COMMANDS;
use super::types::CommandData;
use crate::error::Result;
use crate::session::Accumulator;

/// Direction and multiplicity of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Client → gateway, exactly once per transaction.
    Request,
    /// Gateway → client, one-shot reply to a request.
    Confirmation,
    /// Gateway → client, zero or more per transaction (or broadcast).
    Notification,
}

/// Payload encoder: request parameters plus the allocated session id
/// (when the command carries one) to payload bytes.
pub type EncodeFn = fn(&Value, Option<u16>) -> Result<Vec<u8>>;

/// Payload decoder: payload bytes plus the owning session's
/// accumulator to an optional structured value for the event surface.
pub type DecodeFn = fn(&[u8], &mut Accumulator) -> Result<Option<CommandData>>;

/// Static description of one command.
#[derive(Debug, Clone, Copy)]
pub struct CommandDescriptor {
    /// 16-bit command id.
    pub id: u16,
    /// Canonical name per the KLF 200 Technical Specification 3.18.
    pub name: &'static str,
    /// Role of this command.
    pub role: Role,
    /// For confirmations and notifications: the spawning request id.
    pub req: Option<u16>,
    /// Whether the request assigns (and its replies reference) a
    /// 16-bit session id.
    pub carries_session: bool,
    /// Byte offset of the session id within reply payloads. Almost
    /// always 0; scene confirmations put a status byte first.
    pub session_offset: usize,
    /// Whether completion is signalled by a terminal notification
    /// rather than by the confirmation itself.
    pub spawns_stream: bool,
    /// Whether this notification ends the session it references.
    pub is_session_terminator: bool,
    /// Parameter encoder, absent for commands the API cannot send.
    pub encode: Option<EncodeFn>,
    /// Payload decoder, absent for commands that surface raw bytes.
    pub decode: Option<DecodeFn>,
}

static BY_ID: LazyLock<HashMap<u16, &'static CommandDescriptor>> =
    LazyLock::new(|| COMMANDS.iter().map(|cmd| (cmd.id, cmd)).collect());

static BY_NAME: LazyLock<HashMap<&'static str, &'static CommandDescriptor>> =
    LazyLock::new(|| COMMANDS.iter().map(|cmd| (cmd.name, cmd)).collect());

/// Look up a command by numeric id.
pub fn by_id(id: u16) -> Option<&'static CommandDescriptor> {
    BY_ID.get(&id).copied()
}

/// Look up a command by registry name.
pub fn by_name(name: &str) -> Option<&'static CommandDescriptor> {
    BY_NAME.get(name).copied()
}

/// The whole catalogue.
pub fn all() -> &'static [CommandDescriptor] {
    COMMANDS
}
