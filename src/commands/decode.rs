//! Confirmation and notification payload decoders.
//!
//! Decoders are synchronous pure functions over payload bytes. They
//! may append streamed items to the session accumulator, set a scalar
//! result, or flag the stream as finished; the returned value feeds
//! the event surface.

use super::position::{Position, Velocity};
use super::types::{
    CommandData, CommandStatus, GatewayState, GroupInfo, LocalTime, NodeInfo, NodePositionChange,
    ProtocolVersion, RemainingTime, RunStatus, SceneListEntry, SessionEvent, StatusEntry,
    StatusParameter, SystemTableEntry, VersionInfo,
};
use crate::error::{Error, GatewayError, Result};
use crate::session::Accumulator;

fn expect_len(name: &'static str, payload: &[u8], expected: usize) -> Result<()> {
    if payload.len() != expected {
        return Err(Error::PayloadLength {
            name,
            expected,
            actual: payload.len(),
        });
    }
    Ok(())
}

fn expect_min_len(name: &'static str, payload: &[u8], expected: usize) -> Result<()> {
    if payload.len() < expected {
        return Err(Error::PayloadLength {
            name,
            expected,
            actual: payload.len(),
        });
    }
    Ok(())
}

fn be16(payload: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([payload[offset], payload[offset + 1]])
}

fn be24(payload: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([0, payload[offset], payload[offset + 1], payload[offset + 2]])
}

fn be32(payload: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        payload[offset],
        payload[offset + 1],
        payload[offset + 2],
        payload[offset + 3],
    ])
}

/// Read a zero-terminated UTF-8 string from a fixed-size field.
fn text(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

/// Render eight serial bytes as colon-separated hex.
fn serial(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

// --- authentication -------------------------------------------------------

/// `GW_PASSWORD_ENTER_CFM`: single status byte, non-zero is fatal.
pub(super) fn password_enter_cfm(payload: &[u8], _acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_len("GW_PASSWORD_ENTER_CFM", payload, 1)?;
    if payload[0] != 0 {
        return Err(Error::AuthenticationFailed);
    }
    Ok(None)
}

/// `GW_PASSWORD_CHANGE_CFM`: single status byte.
pub(super) fn password_change_cfm(payload: &[u8], _acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_len("GW_PASSWORD_CHANGE_CFM", payload, 1)?;
    if payload[0] != 0 {
        return Err(Error::Gateway(GatewayError::InvalidPassword));
    }
    Ok(None)
}

/// `GW_PASSWORD_CHANGE_NTF`: 32-byte echo of the new password.
pub(super) fn password_change_ntf(payload: &[u8], _acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_len("GW_PASSWORD_CHANGE_NTF", payload, 32)?;
    Ok(Some(CommandData::Password(text(payload))))
}

// --- gateway information --------------------------------------------------

/// `GW_GET_VERSION_CFM`: six software version bytes plus hardware and
/// product identifiers.
pub(super) fn version_cfm(payload: &[u8], acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_len("GW_GET_VERSION_CFM", payload, 9)?;
    let software_version = payload[..6]
        .iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join(".");
    let version = VersionInfo {
        software_version,
        hardware_version: payload[6],
        product_group: payload[7],
        product_type: payload[8],
    };
    acc.set_result(CommandData::Version(version.clone()));
    Ok(Some(CommandData::Version(version)))
}

/// `GW_GET_PROTOCOL_VERSION_CFM`: two big-endian words.
pub(super) fn protocol_version_cfm(payload: &[u8], acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_len("GW_GET_PROTOCOL_VERSION_CFM", payload, 4)?;
    let version = ProtocolVersion {
        major: be16(payload, 0),
        minor: be16(payload, 2),
    };
    acc.set_result(CommandData::ProtocolVersion(version));
    Ok(Some(CommandData::ProtocolVersion(version)))
}

/// `GW_GET_STATE_CFM`: state and sub-state bytes (trailing state data
/// is reserved and ignored).
pub(super) fn state_cfm(payload: &[u8], acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_min_len("GW_GET_STATE_CFM", payload, 2)?;
    let state = GatewayState {
        state: payload[0],
        sub_state: payload[1],
    };
    acc.set_result(CommandData::State(state));
    Ok(Some(CommandData::State(state)))
}

/// `GW_GET_LOCAL_TIME_CFM`: gateway clock in broken-down `tm` layout
/// (month is zero-based, year is offset from 1900 on the wire).
pub(super) fn local_time_cfm(payload: &[u8], acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_len("GW_GET_LOCAL_TIME_CFM", payload, 15)?;
    let time = LocalTime {
        utc_timestamp: be32(payload, 0),
        second: payload[4],
        minute: payload[5],
        hour: payload[6],
        day_of_month: payload[7],
        month: payload[8],
        year: 1900 + be16(payload, 9),
        weekday: payload[11],
        day_of_year: be16(payload, 12),
        daylight_saving_flag: payload[14] as i8,
    };
    acc.set_result(CommandData::LocalTime(time));
    Ok(Some(CommandData::LocalTime(time)))
}

// --- system table ---------------------------------------------------------

/// `GW_CS_GET_SYSTEMTABLE_DATA_NTF`: a page of 11-byte actuator
/// entries followed by the remaining-entries count. A zero remainder
/// ends the stream.
pub(super) fn systemtable_ntf(payload: &[u8], acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_min_len("GW_CS_GET_SYSTEMTABLE_DATA_NTF", payload, 2)?;
    let count = payload[0] as usize;
    expect_len("GW_CS_GET_SYSTEMTABLE_DATA_NTF", payload, 2 + count * 11)?;

    let mut page = Vec::with_capacity(count);
    for i in 0..count {
        let base = 1 + i * 11;
        let entry = SystemTableEntry {
            index: payload[base],
            address: be24(payload, base + 1),
            actuator_type: be16(payload, base + 4),
            power_state: payload[base + 6],
            manufacturer: payload[base + 7],
            backbone: be24(payload, base + 8),
        };
        acc.push(CommandData::SystemTableEntry(entry));
        page.push(CommandData::SystemTableEntry(entry));
    }

    let remaining = payload[1 + count * 11];
    if remaining == 0 {
        acc.finish();
    }
    Ok(Some(CommandData::List(page)))
}

// --- nodes ----------------------------------------------------------------

fn node_record(name: &'static str, payload: &[u8]) -> Result<NodeInfo> {
    expect_len(name, payload, 124)?;
    Ok(NodeInfo {
        node_id: payload[0],
        order: be16(payload, 1),
        placement: payload[3],
        name: text(&payload[4..68]),
        velocity: Velocity::from_raw(payload[68]),
        node_type: be16(payload, 69),
        product_group: payload[71],
        product_type: payload[72],
        variation: payload[73],
        power_mode: payload[74],
        build_number: payload[75],
        serial_number: serial(&payload[76..84]),
        state: payload[84],
        current_position: Position::from_bytes(payload[85], payload[86]),
        target_position: Position::from_bytes(payload[87], payload[88]),
        fp1: Position::from_bytes(payload[89], payload[90]),
        fp2: Position::from_bytes(payload[91], payload[92]),
        fp3: Position::from_bytes(payload[93], payload[94]),
        fp4: Position::from_bytes(payload[95], payload[96]),
        remaining_time: be16(payload, 97),
        timestamp: be32(payload, 99),
        alias_count: payload[103],
    })
}

/// `GW_GET_NODE_INFORMATION_CFM`: status plus node id.
pub(super) fn node_information_cfm(payload: &[u8], _acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_len("GW_GET_NODE_INFORMATION_CFM", payload, 2)?;
    match payload[0] {
        0 => Ok(None),
        1 => Err(Error::Gateway(GatewayError::RequestFailed)),
        2 => Err(Error::Gateway(GatewayError::InvalidNodeId)),
        other => Err(Error::Gateway(GatewayError::Unknown(other))),
    }
}

/// `GW_GET_NODE_INFORMATION_NTF`: the 124-byte node record; completes
/// the request.
pub(super) fn node_information_ntf(payload: &[u8], acc: &mut Accumulator) -> Result<Option<CommandData>> {
    let node = node_record("GW_GET_NODE_INFORMATION_NTF", payload)?;
    acc.set_result(CommandData::Node(node.clone()));
    acc.finish();
    Ok(Some(CommandData::Node(node)))
}

/// `GW_GET_ALL_NODES_INFORMATION_CFM`: status plus total node count.
pub(super) fn all_nodes_cfm(payload: &[u8], _acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_len("GW_GET_ALL_NODES_INFORMATION_CFM", payload, 2)?;
    if payload[0] != 0 {
        return Err(Error::Gateway(GatewayError::EmptySystemTable));
    }
    Ok(Some(CommandData::Count(payload[1])))
}

/// `GW_GET_ALL_NODES_INFORMATION_NTF`: one node record per frame.
pub(super) fn all_nodes_ntf(payload: &[u8], acc: &mut Accumulator) -> Result<Option<CommandData>> {
    let node = node_record("GW_GET_ALL_NODES_INFORMATION_NTF", payload)?;
    acc.push(CommandData::Node(node.clone()));
    Ok(Some(CommandData::Node(node)))
}

/// `GW_NODE_STATE_POSITION_CHANGED_NTF`: broadcast position update.
pub(super) fn node_position_changed_ntf(payload: &[u8], _acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_len("GW_NODE_STATE_POSITION_CHANGED_NTF", payload, 20)?;
    let change = NodePositionChange {
        node_id: payload[0],
        state: payload[1],
        current_position: Position::from_bytes(payload[2], payload[3]),
        target_position: Position::from_bytes(payload[4], payload[5]),
        fp1: Position::from_bytes(payload[6], payload[7]),
        fp2: Position::from_bytes(payload[8], payload[9]),
        fp3: Position::from_bytes(payload[10], payload[11]),
        fp4: Position::from_bytes(payload[12], payload[13]),
        remaining_time: be16(payload, 14),
        timestamp: be32(payload, 16),
    };
    Ok(Some(CommandData::NodePosition(change)))
}

// --- groups ---------------------------------------------------------------

/// Decode the 200-bit membership bitmap into node ids (LSB first).
fn membership(bitmap: &[u8]) -> Vec<u8> {
    let mut nodes = Vec::new();
    for (byte_index, &byte) in bitmap.iter().enumerate() {
        for bit in 0..8 {
            if byte & (1 << bit) != 0 {
                nodes.push((byte_index * 8 + bit) as u8);
            }
        }
    }
    nodes
}

fn group_record(name: &'static str, payload: &[u8]) -> Result<GroupInfo> {
    expect_len(name, payload, 99)?;
    Ok(GroupInfo {
        group_id: payload[0],
        order: be16(payload, 1),
        placement: payload[3],
        name: text(&payload[4..68]),
        velocity: Velocity::from_raw(payload[68]),
        node_variation: payload[69],
        group_type: payload[70],
        nodes: membership(&payload[72..97]),
        revision: be16(payload, 97),
    })
}

/// `GW_GET_GROUP_INFORMATION_CFM`: status plus group id.
pub(super) fn group_information_cfm(payload: &[u8], _acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_len("GW_GET_GROUP_INFORMATION_CFM", payload, 2)?;
    match payload[0] {
        0 => Ok(None),
        1 => Err(Error::Gateway(GatewayError::RequestFailed)),
        2 => Err(Error::Gateway(GatewayError::InvalidParameter)),
        other => Err(Error::Gateway(GatewayError::Unknown(other))),
    }
}

/// `GW_GET_GROUP_INFORMATION_NTF`: the group record; completes the
/// request.
pub(super) fn group_information_ntf(payload: &[u8], acc: &mut Accumulator) -> Result<Option<CommandData>> {
    let group = group_record("GW_GET_GROUP_INFORMATION_NTF", payload)?;
    acc.set_result(CommandData::Group(group.clone()));
    acc.finish();
    Ok(Some(CommandData::Group(group)))
}

/// `GW_GET_ALL_GROUPS_INFORMATION_CFM`: status plus total group count.
pub(super) fn all_groups_cfm(payload: &[u8], _acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_len("GW_GET_ALL_GROUPS_INFORMATION_CFM", payload, 2)?;
    match payload[0] {
        0 => Ok(Some(CommandData::Count(payload[1]))),
        1 => Err(Error::Gateway(GatewayError::RequestFailed)),
        2 => Err(Error::Gateway(GatewayError::InvalidGroupType)),
        other => Err(Error::Gateway(GatewayError::Unknown(other))),
    }
}

/// `GW_GET_ALL_GROUPS_INFORMATION_NTF`: one group record per frame.
pub(super) fn all_groups_ntf(payload: &[u8], acc: &mut Accumulator) -> Result<Option<CommandData>> {
    let group = group_record("GW_GET_ALL_GROUPS_INFORMATION_NTF", payload)?;
    acc.push(CommandData::Group(group.clone()));
    Ok(Some(CommandData::Group(group)))
}

// --- scenes ---------------------------------------------------------------

/// `GW_GET_SCENE_LIST_CFM`: total scene count.
pub(super) fn scene_list_cfm(payload: &[u8], _acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_len("GW_GET_SCENE_LIST_CFM", payload, 1)?;
    Ok(Some(CommandData::Count(payload[0])))
}

/// `GW_GET_SCENE_LIST_NTF`: a page of 65-byte scene entries followed
/// by the remaining-entries count.
pub(super) fn scene_list_ntf(payload: &[u8], acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_min_len("GW_GET_SCENE_LIST_NTF", payload, 2)?;
    let count = payload[0] as usize;
    expect_len("GW_GET_SCENE_LIST_NTF", payload, 2 + count * 65)?;

    let mut page = Vec::with_capacity(count);
    for i in 0..count {
        let base = 1 + i * 65;
        let entry = SceneListEntry {
            scene_id: payload[base],
            name: text(&payload[base + 1..base + 65]),
        };
        acc.push(CommandData::Scene(entry.clone()));
        page.push(CommandData::Scene(entry));
    }

    let remaining = payload[1 + count * 65];
    if remaining == 0 {
        acc.finish();
    }
    Ok(Some(CommandData::List(page)))
}

/// `GW_ACTIVATE_SCENE_CFM` / `GW_STOP_SCENE_CFM`: status byte before
/// the session id.
pub(super) fn scene_session_cfm(payload: &[u8], _acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_len("GW_ACTIVATE_SCENE_CFM", payload, 3)?;
    let session_id = be16(payload, 1);
    match payload[0] {
        0 => Ok(Some(CommandData::CommandStatus(CommandStatus {
            session_id,
            accepted: true,
        }))),
        1 => Err(Error::Gateway(GatewayError::InvalidParameter)),
        2 => Err(Error::Gateway(GatewayError::RequestFailed)),
        other => Err(Error::Gateway(GatewayError::Unknown(other))),
    }
}

// --- command sessions -----------------------------------------------------

/// `GW_COMMAND_SEND_CFM` / `GW_STATUS_REQUEST_CFM` / `GW_WINK_SEND_CFM`:
/// session id plus acceptance byte (1 accepted, 0 rejected).
pub(super) fn session_accept_cfm(payload: &[u8], _acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_len("GW_COMMAND_SEND_CFM", payload, 3)?;
    let session_id = be16(payload, 0);
    match payload[2] {
        1 => Ok(Some(CommandData::CommandStatus(CommandStatus {
            session_id,
            accepted: true,
        }))),
        0 => Err(Error::Gateway(GatewayError::SessionInUse)),
        other => Err(Error::Gateway(GatewayError::Unknown(other))),
    }
}

/// `GW_ACTIVATE_PRODUCTGROUP_CFM`: session id plus status byte with
/// zero meaning accepted.
pub(super) fn productgroup_cfm(payload: &[u8], _acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_len("GW_ACTIVATE_PRODUCTGROUP_CFM", payload, 3)?;
    let session_id = be16(payload, 0);
    match payload[2] {
        0 => Ok(Some(CommandData::CommandStatus(CommandStatus {
            session_id,
            accepted: true,
        }))),
        1 => Err(Error::Gateway(GatewayError::InvalidParameter)),
        _ => Err(Error::Gateway(GatewayError::RequestFailed)),
    }
}

/// `GW_COMMAND_RUN_STATUS_NTF`: per-node movement progress.
pub(super) fn run_status_ntf(payload: &[u8], acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_len("GW_COMMAND_RUN_STATUS_NTF", payload, 13)?;
    let status = RunStatus {
        session_id: be16(payload, 0),
        status_owner: payload[2],
        node_id: payload[3],
        parameter: payload[4],
        parameter_value: be16(payload, 5),
        run_status: payload[7],
        status_reply: payload[8],
        information_code: be32(payload, 9),
    };
    acc.push(CommandData::RunStatus(status));
    Ok(Some(CommandData::RunStatus(status)))
}

/// `GW_COMMAND_REMAINING_TIME_NTF`: seconds left for one node.
pub(super) fn remaining_time_ntf(payload: &[u8], acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_len("GW_COMMAND_REMAINING_TIME_NTF", payload, 6)?;
    let remaining = RemainingTime {
        session_id: be16(payload, 0),
        node_id: payload[2],
        parameter: payload[3],
        seconds: be16(payload, 4),
    };
    acc.push(CommandData::RemainingTime(remaining));
    Ok(Some(CommandData::RemainingTime(remaining)))
}

/// `GW_SESSION_FINISHED_NTF`: end-of-session marker.
pub(super) fn session_finished_ntf(payload: &[u8], _acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_len("GW_SESSION_FINISHED_NTF", payload, 2)?;
    Ok(Some(CommandData::Session(SessionEvent {
        session_id: be16(payload, 0),
    })))
}

/// `GW_WINK_SEND_NTF`: wink completed for this session.
pub(super) fn wink_ntf(payload: &[u8], _acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_len("GW_WINK_SEND_NTF", payload, 2)?;
    Ok(Some(CommandData::Session(SessionEvent {
        session_id: be16(payload, 0),
    })))
}

/// `GW_STATUS_REQUEST_NTF`: one node status report. Status type 3
/// carries the main-info layout, the others a parameter list.
pub(super) fn status_request_ntf(payload: &[u8], acc: &mut Accumulator) -> Result<Option<CommandData>> {
    expect_min_len("GW_STATUS_REQUEST_NTF", payload, 7)?;
    let status_type = payload[6];

    let mut entry = StatusEntry {
        session_id: be16(payload, 0),
        status_owner: payload[2],
        node_id: payload[3],
        run_status: payload[4],
        status_reply: payload[5],
        status_type,
        target_position: None,
        current_position: None,
        remaining_time: None,
        last_master_execution_address: None,
        last_command_originator: None,
        parameters: Vec::new(),
    };

    if status_type == 3 {
        expect_len("GW_STATUS_REQUEST_NTF", payload, 18)?;
        entry.target_position = Some(Position::from_bytes(payload[7], payload[8]));
        entry.current_position = Some(Position::from_bytes(payload[9], payload[10]));
        entry.remaining_time = Some(be16(payload, 11));
        entry.last_master_execution_address = Some(be32(payload, 13));
        entry.last_command_originator = Some(payload[17]);
    } else {
        expect_min_len("GW_STATUS_REQUEST_NTF", payload, 8)?;
        let count = payload[7] as usize;
        expect_len("GW_STATUS_REQUEST_NTF", payload, 8 + count * 3)?;
        for i in 0..count {
            let base = 8 + i * 3;
            entry.parameters.push(StatusParameter {
                id: payload[base],
                value: be16(payload, base + 1),
            });
        }
    }

    acc.push(CommandData::Status(entry.clone()));
    Ok(Some(CommandData::Status(entry)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acc() -> Accumulator {
        Accumulator::new()
    }

    #[test]
    fn test_password_enter_cfm_success() {
        let mut a = acc();
        assert!(password_enter_cfm(&[0], &mut a).unwrap().is_none());
    }

    #[test]
    fn test_password_enter_cfm_failure_is_fatal() {
        let mut a = acc();
        assert!(matches!(
            password_enter_cfm(&[1], &mut a),
            Err(Error::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_password_enter_cfm_length_checked() {
        let mut a = acc();
        assert!(matches!(
            password_enter_cfm(&[0, 0], &mut a),
            Err(Error::PayloadLength { .. })
        ));
    }

    #[test]
    fn test_version_cfm() {
        let mut a = acc();
        let value = version_cfm(&[0, 2, 0, 0, 71, 0, 5, 14, 3], &mut a)
            .unwrap()
            .unwrap();
        let version = value.as_version().unwrap();
        assert_eq!(version.software_version, "0.2.0.0.71.0");
        assert_eq!(version.hardware_version, 5);
        assert_eq!(version.product_group, 14);
        assert_eq!(version.product_type, 3);
    }

    #[test]
    fn test_protocol_version_cfm() {
        let mut a = acc();
        let value = protocol_version_cfm(&[0x00, 0x03, 0x00, 0x12], &mut a)
            .unwrap()
            .unwrap();
        assert_eq!(value.as_protocol_version().unwrap().to_string(), "3.18");
    }

    #[test]
    fn test_state_cfm_ignores_reserved_tail() {
        let mut a = acc();
        let value = state_cfm(&[2, 0x80, 0, 0, 0, 0], &mut a).unwrap().unwrap();
        let state = value.as_state().unwrap();
        assert_eq!(state.state, 2);
        assert_eq!(state.sub_state, 0x80);
    }

    #[test]
    fn test_systemtable_ntf_pages_and_terminates() {
        let mut a = acc();
        let mut page1 = vec![2u8];
        // entry 0: index 0, address 0x000001, type 0x0140, power 5, manufacturer 1, backbone 0
        page1.extend([0, 0x00, 0x00, 0x01, 0x01, 0x40, 5, 1, 0, 0, 0]);
        // entry 1: index 1
        page1.extend([1, 0x00, 0x00, 0x02, 0x01, 0x40, 5, 1, 0, 0, 0]);
        page1.push(1); // one entry remaining

        systemtable_ntf(&page1, &mut a).unwrap();
        assert!(!a.is_finished());
        assert_eq!(a.len(), 2);

        let mut page2 = vec![1u8];
        page2.extend([2, 0x00, 0x00, 0x03, 0x01, 0x40, 5, 1, 0, 0, 0]);
        page2.push(0);

        systemtable_ntf(&page2, &mut a).unwrap();
        assert!(a.is_finished());
        assert_eq!(a.len(), 3);

        match a.into_outcome(true).unwrap() {
            CommandData::List(entries) => {
                assert_eq!(entries.len(), 3);
                match &entries[2] {
                    CommandData::SystemTableEntry(entry) => {
                        assert_eq!(entry.index, 2);
                        assert_eq!(entry.address, 3);
                        assert_eq!(entry.actuator_type, 0x0140);
                    }
                    other => panic!("unexpected entry: {other:?}"),
                }
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_node_record_layout() {
        let mut payload = vec![0u8; 124];
        payload[0] = 7; // node id
        payload[1..3].copy_from_slice(&5u16.to_be_bytes());
        payload[3] = 1; // placement
        payload[4..11].copy_from_slice(b"Bedroom");
        payload[68] = 1; // velocity: slow
        payload[69..71].copy_from_slice(&0x0101u16.to_be_bytes());
        payload[76..84].copy_from_slice(&[0x12, 0x34, 0, 0, 0, 0, 0, 0x01]);
        payload[84] = 4; // state: executing
        payload[85..87].copy_from_slice(&0x6400u16.to_be_bytes()); // 50%
        payload[87..89].copy_from_slice(&0xC800u16.to_be_bytes()); // 100%
        payload[89..91].copy_from_slice(&0xF7FFu16.to_be_bytes()); // unknown
        payload[97..99].copy_from_slice(&30u16.to_be_bytes());
        payload[99..103].copy_from_slice(&0x5FDE_0000u32.to_be_bytes());
        payload[103] = 1;

        let node = node_record("test", &payload).unwrap();
        assert_eq!(node.node_id, 7);
        assert_eq!(node.order, 5);
        assert_eq!(node.name, "Bedroom");
        assert_eq!(node.velocity, Velocity::Slow);
        assert_eq!(node.node_type, 0x0101);
        assert_eq!(node.serial_number, "12:34:00:00:00:00:00:01");
        assert_eq!(node.current_position, Position::Percent(50));
        assert_eq!(node.target_position, Position::Percent(100));
        assert_eq!(node.fp1, Position::Unknown);
        assert_eq!(node.remaining_time, 30);
        assert_eq!(node.timestamp, 0x5FDE_0000);
        assert_eq!(node.alias_count, 1);
    }

    #[test]
    fn test_node_record_length_mismatch() {
        assert!(matches!(
            node_record("test", &[0u8; 120]),
            Err(Error::PayloadLength { .. })
        ));
    }

    #[test]
    fn test_node_information_cfm_status_mapping() {
        let mut a = acc();
        assert!(node_information_cfm(&[0, 3], &mut a).unwrap().is_none());
        assert!(matches!(
            node_information_cfm(&[1, 0], &mut a),
            Err(Error::Gateway(GatewayError::RequestFailed))
        ));
        assert!(matches!(
            node_information_cfm(&[2, 0], &mut a),
            Err(Error::Gateway(GatewayError::InvalidNodeId))
        ));
    }

    #[test]
    fn test_group_membership_bitmap() {
        let mut payload = vec![0u8; 99];
        payload[0] = 2; // group id
        payload[4..9].copy_from_slice(b"South");
        payload[70] = 0; // user group
        payload[71] = 3;
        payload[72] = 0b0000_0110; // nodes 1, 2
        payload[73] = 0b0000_0001; // node 8
        payload[97..99].copy_from_slice(&7u16.to_be_bytes());

        let group = group_record("test", &payload).unwrap();
        assert_eq!(group.group_id, 2);
        assert_eq!(group.name, "South");
        assert_eq!(group.nodes, vec![1, 2, 8]);
        assert_eq!(group.revision, 7);
    }

    #[test]
    fn test_session_accept_cfm() {
        let mut a = acc();
        let value = session_accept_cfm(&[0x00, 0x42, 1], &mut a).unwrap().unwrap();
        match value {
            CommandData::CommandStatus(status) => {
                assert_eq!(status.session_id, 0x42);
                assert!(status.accepted);
            }
            other => panic!("unexpected value: {other:?}"),
        }

        assert!(matches!(
            session_accept_cfm(&[0x00, 0x42, 0], &mut a),
            Err(Error::Gateway(GatewayError::SessionInUse))
        ));
    }

    #[test]
    fn test_run_status_ntf_accumulates() {
        let mut a = acc();
        let payload = [
            0x00, 0x42, // session
            1,    // owner
            2,    // node
            0,    // parameter
            0x00, 0x00, // value
            0,    // run status: completed
            1,    // status reply
            0, 0, 0, 0, // information code
        ];
        run_status_ntf(&payload, &mut a).unwrap();
        run_status_ntf(&payload, &mut a).unwrap();
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_status_request_ntf_main_info() {
        let mut a = acc();
        let mut payload = vec![0x00, 0x07, 1, 9, 2, 0, 3];
        payload.extend(0xC800u16.to_be_bytes()); // target
        payload.extend(0x6400u16.to_be_bytes()); // current
        payload.extend(42u16.to_be_bytes());
        payload.extend(0xDEAD_BEEFu32.to_be_bytes());
        payload.push(1);

        let value = status_request_ntf(&payload, &mut a).unwrap().unwrap();
        match value {
            CommandData::Status(entry) => {
                assert_eq!(entry.node_id, 9);
                assert_eq!(entry.target_position, Some(Position::Percent(100)));
                assert_eq!(entry.current_position, Some(Position::Percent(50)));
                assert_eq!(entry.remaining_time, Some(42));
                assert_eq!(entry.last_master_execution_address, Some(0xDEAD_BEEF));
                assert!(entry.parameters.is_empty());
            }
            other => panic!("unexpected value: {other:?}"),
        }
    }

    #[test]
    fn test_status_request_ntf_parameter_list() {
        let mut a = acc();
        let payload = [
            0x00, 0x07, 1, 9, 2, 0, 1, // status type 1
            2, // two parameters
            0, 0x64, 0x00, // parameter 0
            1, 0xC8, 0x00, // parameter 1
        ];
        let value = status_request_ntf(&payload, &mut a).unwrap().unwrap();
        match value {
            CommandData::Status(entry) => {
                assert_eq!(entry.parameters.len(), 2);
                assert_eq!(entry.parameters[1].id, 1);
                assert_eq!(entry.parameters[1].value, 0xC800);
                assert!(entry.target_position.is_none());
            }
            other => panic!("unexpected value: {other:?}"),
        }
    }

    #[test]
    fn test_scene_list_ntf() {
        let mut a = acc();
        let mut payload = vec![1u8, 4];
        let mut name = [0u8; 64];
        name[..5].copy_from_slice(b"Night");
        payload.extend_from_slice(&name);
        payload.push(0);

        scene_list_ntf(&payload, &mut a).unwrap();
        assert!(a.is_finished());
        match a.into_outcome(true).unwrap() {
            CommandData::List(scenes) => match &scenes[0] {
                CommandData::Scene(scene) => {
                    assert_eq!(scene.scene_id, 4);
                    assert_eq!(scene.name, "Night");
                }
                other => panic!("unexpected entry: {other:?}"),
            },
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_session_finished_ntf() {
        let mut a = acc();
        let value = session_finished_ntf(&[0x00, 0x42], &mut a).unwrap().unwrap();
        assert_eq!(value, CommandData::Session(SessionEvent { session_id: 0x42 }));
        assert_eq!(a.len(), 0);
    }

    #[test]
    fn test_scene_session_cfm_status_first() {
        let mut a = acc();
        let value = scene_session_cfm(&[0, 0x00, 0x05], &mut a).unwrap().unwrap();
        match value {
            CommandData::CommandStatus(status) => assert_eq!(status.session_id, 5),
            other => panic!("unexpected value: {other:?}"),
        }
    }
}
