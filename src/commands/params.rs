//! Request payload encoders.
//!
//! Parameters arrive as a `serde_json::Value` (the engine treats them
//! as opaque); each encoder deserializes them into a typed struct and
//! lays out the fixed KLF payload. Session-bearing encoders receive
//! the session id the pipeline allocated.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::position::{Position, Velocity};
use crate::error::{Error, Result};

/// Maximum nodes addressable by one command (index array size).
const MAX_NODES: usize = 20;

fn parse<T: DeserializeOwned>(params: &Value) -> Result<T> {
    let value = if params.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        params.clone()
    };
    serde_json::from_value(value).map_err(|e| Error::InvalidParams(e.to_string()))
}

fn session(session: Option<u16>) -> Result<u16> {
    session.ok_or_else(|| Error::InvalidParams("session id not allocated".into()))
}

/// Copy a string into a fixed zero-padded buffer.
fn padded(text: &str, len: usize) -> Result<Vec<u8>> {
    let bytes = text.as_bytes();
    if bytes.len() > len {
        return Err(Error::InvalidParams(format!(
            "string too long: {} bytes (max {len})",
            bytes.len()
        )));
    }
    let mut buf = vec![0u8; len];
    buf[..bytes.len()].copy_from_slice(bytes);
    Ok(buf)
}

/// Validate a node id list and lay it out as count + 20-byte index array.
fn index_array(node_ids: &[u8]) -> Result<Vec<u8>> {
    if node_ids.is_empty() || node_ids.len() > MAX_NODES {
        return Err(Error::InvalidParams(format!(
            "nodeIds must hold 1..={MAX_NODES} entries, got {}",
            node_ids.len()
        )));
    }
    if let Some(&bad) = node_ids.iter().find(|&&id| id > 199) {
        return Err(Error::InvalidParams(format!("node id out of range: {bad}")));
    }
    let mut buf = Vec::with_capacity(1 + MAX_NODES);
    buf.push(node_ids.len() as u8);
    buf.extend_from_slice(node_ids);
    buf.resize(1 + MAX_NODES, 0);
    Ok(buf)
}

fn default_originator() -> u8 {
    1 // user
}

fn default_priority() -> u8 {
    3 // user level 2
}

fn default_wink_time() -> u8 {
    254 // manufacturer-specific wink
}

fn default_status_type() -> u8 {
    3 // main info
}

/// Encoder for requests with an empty payload.
pub(super) fn empty(_params: &Value, _session: Option<u16>) -> Result<Vec<u8>> {
    Ok(Vec::new())
}

#[derive(Deserialize)]
struct PasswordEnterParams {
    password: String,
}

/// `GW_PASSWORD_ENTER_REQ`: 32-byte zero-padded ASCII password.
pub(super) fn password_enter(params: &Value, _session: Option<u16>) -> Result<Vec<u8>> {
    let p: PasswordEnterParams = parse(params)?;
    padded(&p.password, 32)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordChangeParams {
    old_password: String,
    new_password: String,
}

/// `GW_PASSWORD_CHANGE_REQ`: old and new password, 32 bytes each.
pub(super) fn password_change(params: &Value, _session: Option<u16>) -> Result<Vec<u8>> {
    let p: PasswordChangeParams = parse(params)?;
    let mut buf = padded(&p.old_password, 32)?;
    buf.extend(padded(&p.new_password, 32)?);
    Ok(buf)
}

#[derive(Deserialize)]
struct SetUtcParams {
    timestamp: u32,
}

/// `GW_SET_UTC_REQ`: epoch seconds, big-endian.
pub(super) fn set_utc(params: &Value, _session: Option<u16>) -> Result<Vec<u8>> {
    let p: SetUtcParams = parse(params)?;
    Ok(p.timestamp.to_be_bytes().to_vec())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeZoneParams {
    time_zone: String,
}

/// `GW_RTC_SET_TIME_ZONE_REQ`: 64-byte zero-terminated time zone string.
pub(super) fn rtc_set_time_zone(params: &Value, _session: Option<u16>) -> Result<Vec<u8>> {
    let p: TimeZoneParams = parse(params)?;
    // Keep one byte for the terminator.
    if p.time_zone.len() > 63 {
        return Err(Error::InvalidParams("time zone string too long".into()));
    }
    padded(&p.time_zone, 64)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeIdParams {
    node_id: u8,
}

/// `GW_GET_NODE_INFORMATION_REQ`: single node index byte.
pub(super) fn get_node_information(params: &Value, _session: Option<u16>) -> Result<Vec<u8>> {
    let p: NodeIdParams = parse(params)?;
    if p.node_id > 199 {
        return Err(Error::InvalidParams(format!(
            "node id out of range: {}",
            p.node_id
        )));
    }
    Ok(vec![p.node_id])
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupIdParams {
    group_id: u8,
}

/// `GW_GET_GROUP_INFORMATION_REQ`: single group index byte.
pub(super) fn get_group_information(params: &Value, _session: Option<u16>) -> Result<Vec<u8>> {
    let p: GroupIdParams = parse(params)?;
    if p.group_id > 99 {
        return Err(Error::InvalidParams(format!(
            "group id out of range: {}",
            p.group_id
        )));
    }
    Ok(vec![p.group_id])
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct AllGroupsParams {
    use_filter: bool,
    group_type: u8,
}

/// `GW_GET_ALL_GROUPS_INFORMATION_REQ`: filter flag plus group type.
pub(super) fn get_all_groups_information(params: &Value, _session: Option<u16>) -> Result<Vec<u8>> {
    let p: AllGroupsParams = parse(params)?;
    Ok(vec![u8::from(p.use_filter), p.group_type])
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommandSendParams {
    position: Position,
    node_ids: Vec<u8>,
    #[serde(default = "default_originator")]
    originator: u8,
    #[serde(default = "default_priority")]
    priority: u8,
    #[serde(default)]
    parameter_active: u8,
    #[serde(default)]
    priority_level_lock: u8,
    #[serde(default)]
    lock_time: u8,
}

/// `GW_COMMAND_SEND_REQ`: the 66-byte movement command.
pub(super) fn command_send(params: &Value, session: Option<u16>) -> Result<Vec<u8>> {
    let p: CommandSendParams = parse(params)?;
    let sid = self::session(session)?;

    let mut buf = Vec::with_capacity(66);
    buf.extend_from_slice(&sid.to_be_bytes());
    buf.push(p.originator);
    buf.push(p.priority);
    buf.push(p.parameter_active);
    buf.push(0); // FPI1
    buf.push(0); // FPI2
    // Functional parameter values: main parameter plus FP1..FP16.
    buf.extend_from_slice(&p.position.to_raw().to_be_bytes());
    buf.extend_from_slice(&[0u8; 32]);
    buf.extend(index_array(&p.node_ids)?);
    buf.push(p.priority_level_lock);
    buf.push(0); // PL_0_3
    buf.push(0); // PL_4_7
    buf.push(p.lock_time);
    debug_assert_eq!(buf.len(), 66);
    Ok(buf)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusRequestParams {
    node_ids: Vec<u8>,
    #[serde(default = "default_status_type")]
    status_type: u8,
    #[serde(default)]
    fpi1: u8,
    #[serde(default)]
    fpi2: u8,
}

/// `GW_STATUS_REQUEST_REQ`: 26-byte node status query.
pub(super) fn status_request(params: &Value, session: Option<u16>) -> Result<Vec<u8>> {
    let p: StatusRequestParams = parse(params)?;
    let sid = self::session(session)?;

    let mut buf = Vec::with_capacity(26);
    buf.extend_from_slice(&sid.to_be_bytes());
    buf.extend(index_array(&p.node_ids)?);
    buf.push(p.status_type);
    buf.push(p.fpi1);
    buf.push(p.fpi2);
    debug_assert_eq!(buf.len(), 26);
    Ok(buf)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WinkSendParams {
    node_ids: Vec<u8>,
    #[serde(default = "default_originator")]
    originator: u8,
    #[serde(default = "default_priority")]
    priority: u8,
    /// Enable (true) or stop (false) winking.
    #[serde(default = "default_wink_state")]
    state: bool,
    #[serde(default = "default_wink_time")]
    time: u8,
}

fn default_wink_state() -> bool {
    true
}

/// `GW_WINK_SEND_REQ`: 27-byte wink command.
pub(super) fn wink_send(params: &Value, session: Option<u16>) -> Result<Vec<u8>> {
    let p: WinkSendParams = parse(params)?;
    let sid = self::session(session)?;

    let mut buf = Vec::with_capacity(27);
    buf.extend_from_slice(&sid.to_be_bytes());
    buf.push(p.originator);
    buf.push(p.priority);
    buf.push(u8::from(p.state));
    buf.push(p.time);
    buf.extend(index_array(&p.node_ids)?);
    debug_assert_eq!(buf.len(), 27);
    Ok(buf)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivateProductGroupParams {
    group_id: u8,
    position: Position,
    #[serde(default)]
    parameter_id: u8,
    #[serde(default = "default_originator")]
    originator: u8,
    #[serde(default = "default_priority")]
    priority: u8,
    #[serde(default = "Velocity::default_wire")]
    velocity: Velocity,
    #[serde(default)]
    priority_level_lock: u8,
    #[serde(default)]
    lock_time: u8,
}

/// `GW_ACTIVATE_PRODUCTGROUP_REQ`: 13-byte group movement command.
pub(super) fn activate_productgroup(params: &Value, session: Option<u16>) -> Result<Vec<u8>> {
    let p: ActivateProductGroupParams = parse(params)?;
    let sid = self::session(session)?;

    let mut buf = Vec::with_capacity(13);
    buf.extend_from_slice(&sid.to_be_bytes());
    buf.push(p.originator);
    buf.push(p.priority);
    buf.push(p.group_id);
    buf.push(p.parameter_id);
    buf.extend_from_slice(&p.position.to_raw().to_be_bytes());
    buf.push(p.velocity.to_raw());
    buf.push(p.priority_level_lock);
    buf.push(0); // PL_0_3
    buf.push(0); // PL_4_7
    buf.push(p.lock_time);
    debug_assert_eq!(buf.len(), 13);
    Ok(buf)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivateSceneParams {
    scene_id: u8,
    #[serde(default = "default_originator")]
    originator: u8,
    #[serde(default = "default_priority")]
    priority: u8,
    #[serde(default = "Velocity::default_wire")]
    velocity: Velocity,
}

/// `GW_ACTIVATE_SCENE_REQ`: 6-byte scene activation.
pub(super) fn activate_scene(params: &Value, session: Option<u16>) -> Result<Vec<u8>> {
    let p: ActivateSceneParams = parse(params)?;
    let sid = self::session(session)?;

    let mut buf = Vec::with_capacity(6);
    buf.extend_from_slice(&sid.to_be_bytes());
    buf.push(p.originator);
    buf.push(p.priority);
    buf.push(p.scene_id);
    buf.push(p.velocity.to_raw());
    Ok(buf)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StopSceneParams {
    scene_id: u8,
    #[serde(default = "default_originator")]
    originator: u8,
    #[serde(default = "default_priority")]
    priority: u8,
}

/// `GW_STOP_SCENE_REQ`: 5-byte scene stop.
pub(super) fn stop_scene(params: &Value, session: Option<u16>) -> Result<Vec<u8>> {
    let p: StopSceneParams = parse(params)?;
    let sid = self::session(session)?;

    let mut buf = Vec::with_capacity(5);
    buf.extend_from_slice(&sid.to_be_bytes());
    buf.push(p.originator);
    buf.push(p.priority);
    buf.push(p.scene_id);
    Ok(buf)
}
