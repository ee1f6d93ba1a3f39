//! Decoded payload types.
//!
//! Every confirmation or notification with a structured decoder
//! produces one of these values. They all derive `Serialize` so the
//! CLI can render results as JSON; field names follow the JSON
//! camelCase convention of the gateway tooling.

use std::fmt;

use serde::{Serialize, Serializer};

use super::position::{Position, Velocity};

/// Gateway software/hardware version (`GW_GET_VERSION_CFM`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    /// Six-part software version, rendered `a.b.c.d.e.f`.
    pub software_version: String,
    pub hardware_version: u8,
    pub product_group: u8,
    pub product_type: u8,
}

/// Protocol version (`GW_GET_PROTOCOL_VERSION_CFM`), rendered `major.minor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolVersion {
    pub major: u16,
    pub minor: u16,
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl Serialize for ProtocolVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Gateway state and sub-state (`GW_GET_STATE_CFM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayState {
    pub state: u8,
    pub sub_state: u8,
}

/// Gateway clock (`GW_GET_LOCAL_TIME_CFM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalTime {
    /// Seconds since the Unix epoch, gateway UTC clock.
    pub utc_timestamp: u32,
    pub second: u8,
    pub minute: u8,
    pub hour: u8,
    pub day_of_month: u8,
    pub month: u8,
    pub year: u16,
    pub weekday: u8,
    pub day_of_year: u16,
    pub daylight_saving_flag: i8,
}

/// One actuator entry from the system table stream
/// (`GW_CS_GET_SYSTEMTABLE_DATA_NTF`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemTableEntry {
    pub index: u8,
    /// 24-bit io-homecontrol actuator address.
    pub address: u32,
    pub actuator_type: u16,
    pub power_state: u8,
    pub manufacturer: u8,
    /// 24-bit backbone reference.
    pub backbone: u32,
}

/// Full actuator record (`GW_GET_NODE_INFORMATION_NTF`,
/// `GW_GET_ALL_NODES_INFORMATION_NTF`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    pub node_id: u8,
    pub order: u16,
    pub placement: u8,
    pub name: String,
    pub velocity: Velocity,
    pub node_type: u16,
    pub product_group: u8,
    pub product_type: u8,
    pub variation: u8,
    pub power_mode: u8,
    pub build_number: u8,
    /// Eight serial bytes, rendered as colon-separated hex.
    pub serial_number: String,
    pub state: u8,
    pub current_position: Position,
    pub target_position: Position,
    pub fp1: Position,
    pub fp2: Position,
    pub fp3: Position,
    pub fp4: Position,
    pub remaining_time: u16,
    /// Seconds since the Unix epoch of the last position change.
    pub timestamp: u32,
    pub alias_count: u8,
}

/// Group record (`GW_GET_GROUP_INFORMATION_NTF`,
/// `GW_GET_ALL_GROUPS_INFORMATION_NTF`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    pub group_id: u8,
    pub order: u16,
    pub placement: u8,
    pub name: String,
    pub velocity: Velocity,
    pub node_variation: u8,
    pub group_type: u8,
    /// Node ids decoded from the 200-bit membership bitmap.
    pub nodes: Vec<u8>,
    pub revision: u16,
}

/// One scene from the scene list stream (`GW_GET_SCENE_LIST_NTF`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneListEntry {
    pub scene_id: u8,
    pub name: String,
}

/// Per-node progress report within a command session
/// (`GW_COMMAND_RUN_STATUS_NTF`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStatus {
    pub session_id: u16,
    pub status_owner: u8,
    pub node_id: u8,
    pub parameter: u8,
    pub parameter_value: u16,
    pub run_status: u8,
    pub status_reply: u8,
    pub information_code: u32,
}

/// Remaining movement time for a node (`GW_COMMAND_REMAINING_TIME_NTF`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemainingTime {
    pub session_id: u16,
    pub node_id: u8,
    pub parameter: u8,
    pub seconds: u16,
}

/// A session-scoped event carrying only the session id
/// (`GW_SESSION_FINISHED_NTF`, `GW_WINK_SEND_NTF`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEvent {
    pub session_id: u16,
}

/// Acceptance report for a session request (`GW_COMMAND_SEND_CFM` and
/// friends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandStatus {
    pub session_id: u16,
    pub accepted: bool,
}

/// One functional parameter reported by a status request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusParameter {
    pub id: u8,
    pub value: u16,
}

/// Node status report (`GW_STATUS_REQUEST_NTF`). The main-info shape
/// (status type 3) fills the position fields; the run-status shapes
/// fill `parameters` instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEntry {
    pub session_id: u16,
    pub status_owner: u8,
    pub node_id: u8,
    pub run_status: u8,
    pub status_reply: u8,
    pub status_type: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_time: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_master_execution_address: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_command_originator: Option<u8>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<StatusParameter>,
}

/// Broadcast position update (`GW_NODE_STATE_POSITION_CHANGED_NTF`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePositionChange {
    pub node_id: u8,
    pub state: u8,
    pub current_position: Position,
    pub target_position: Position,
    pub fp1: Position,
    pub fp2: Position,
    pub fp3: Position,
    pub fp4: Position,
    pub remaining_time: u16,
    pub timestamp: u32,
}

/// Any decoded confirmation or notification payload.
///
/// Serialized untagged: the JSON shape is that of the inner value, so a
/// streamed result renders as a plain array of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommandData {
    Version(VersionInfo),
    ProtocolVersion(ProtocolVersion),
    State(GatewayState),
    LocalTime(LocalTime),
    SystemTableEntry(SystemTableEntry),
    Node(NodeInfo),
    Group(GroupInfo),
    Scene(SceneListEntry),
    RunStatus(RunStatus),
    RemainingTime(RemainingTime),
    Session(SessionEvent),
    CommandStatus(CommandStatus),
    Status(StatusEntry),
    NodePosition(NodePositionChange),
    /// Password echo from `GW_PASSWORD_CHANGE_NTF`.
    Password(String),
    /// Object count reported by a streaming confirmation.
    Count(u8),
    /// Accumulated notification stream.
    List(Vec<CommandData>),
}

impl CommandData {
    /// Borrow the inner version record, if that is what this is.
    pub fn as_version(&self) -> Option<&VersionInfo> {
        match self {
            CommandData::Version(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the inner protocol version, if that is what this is.
    pub fn as_protocol_version(&self) -> Option<&ProtocolVersion> {
        match self {
            CommandData::ProtocolVersion(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the inner gateway state, if that is what this is.
    pub fn as_state(&self) -> Option<&GatewayState> {
        match self {
            CommandData::State(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the accumulated list, if that is what this is.
    pub fn as_list(&self) -> Option<&[CommandData]> {
        match self {
            CommandData::List(items) => Some(items),
            _ => None,
        }
    }
}
