//! The static command catalogue.
//!
//! Ids and names follow the KLF 200 Technical Specification 3.18.
//! Commands without an encoder cannot be sent through the request API;
//! commands without a decoder surface as raw notifications.

use super::decode;
use super::params;
use super::registry::{CommandDescriptor, Role};

/// Command id of the asynchronous gateway error notification.
pub const ERROR_NTF: u16 = 0x0000;

const BASE: CommandDescriptor = CommandDescriptor {
    id: 0,
    name: "",
    role: Role::Request,
    req: None,
    carries_session: false,
    session_offset: 0,
    spawns_stream: false,
    is_session_terminator: false,
    encode: None,
    decode: None,
};

const REQ: CommandDescriptor = BASE;

const CFM: CommandDescriptor = CommandDescriptor {
    role: Role::Confirmation,
    ..BASE
};

const NTF: CommandDescriptor = CommandDescriptor {
    role: Role::Notification,
    ..BASE
};

pub(super) static COMMANDS: &[CommandDescriptor] = &[
    // General gateway commands.
    CommandDescriptor { id: 0x0000, name: "GW_ERROR_NTF", ..NTF },
    CommandDescriptor { id: 0x0001, name: "GW_REBOOT_REQ", encode: Some(params::empty), ..REQ },
    CommandDescriptor { id: 0x0002, name: "GW_REBOOT_CFM", req: Some(0x0001), ..CFM },
    CommandDescriptor { id: 0x0003, name: "GW_SET_FACTORY_DEFAULT_REQ", encode: Some(params::empty), ..REQ },
    CommandDescriptor { id: 0x0004, name: "GW_SET_FACTORY_DEFAULT_CFM", req: Some(0x0003), ..CFM },
    CommandDescriptor { id: 0x0008, name: "GW_GET_VERSION_REQ", encode: Some(params::empty), ..REQ },
    CommandDescriptor { id: 0x0009, name: "GW_GET_VERSION_CFM", req: Some(0x0008), decode: Some(decode::version_cfm), ..CFM },
    CommandDescriptor { id: 0x000A, name: "GW_GET_PROTOCOL_VERSION_REQ", encode: Some(params::empty), ..REQ },
    CommandDescriptor { id: 0x000B, name: "GW_GET_PROTOCOL_VERSION_CFM", req: Some(0x000A), decode: Some(decode::protocol_version_cfm), ..CFM },
    CommandDescriptor { id: 0x000C, name: "GW_GET_STATE_REQ", encode: Some(params::empty), ..REQ },
    CommandDescriptor { id: 0x000D, name: "GW_GET_STATE_CFM", req: Some(0x000C), decode: Some(decode::state_cfm), ..CFM },
    CommandDescriptor { id: 0x000E, name: "GW_LEAVE_LEARN_STATE_REQ", encode: Some(params::empty), ..REQ },
    CommandDescriptor { id: 0x000F, name: "GW_LEAVE_LEARN_STATE_CFM", req: Some(0x000E), ..CFM },
    CommandDescriptor { id: 0x00E0, name: "GW_GET_NETWORK_SETUP_REQ", encode: Some(params::empty), ..REQ },
    CommandDescriptor { id: 0x00E1, name: "GW_GET_NETWORK_SETUP_CFM", req: Some(0x00E0), ..CFM },
    CommandDescriptor { id: 0x00E2, name: "GW_SET_NETWORK_SETUP_REQ", ..REQ },
    CommandDescriptor { id: 0x00E3, name: "GW_SET_NETWORK_SETUP_CFM", req: Some(0x00E2), ..CFM },
    // Configuration service.
    CommandDescriptor { id: 0x0100, name: "GW_CS_GET_SYSTEMTABLE_DATA_REQ", encode: Some(params::empty), spawns_stream: true, ..REQ },
    CommandDescriptor { id: 0x0101, name: "GW_CS_GET_SYSTEMTABLE_DATA_CFM", req: Some(0x0100), ..CFM },
    CommandDescriptor { id: 0x0102, name: "GW_CS_GET_SYSTEMTABLE_DATA_NTF", req: Some(0x0100), decode: Some(decode::systemtable_ntf), ..NTF },
    CommandDescriptor { id: 0x0103, name: "GW_CS_DISCOVER_NODES_REQ", spawns_stream: true, ..REQ },
    CommandDescriptor { id: 0x0104, name: "GW_CS_DISCOVER_NODES_CFM", req: Some(0x0103), ..CFM },
    CommandDescriptor { id: 0x0105, name: "GW_CS_DISCOVER_NODES_NTF", req: Some(0x0103), is_session_terminator: true, ..NTF },
    CommandDescriptor { id: 0x0106, name: "GW_CS_REMOVE_NODES_REQ", ..REQ },
    CommandDescriptor { id: 0x0107, name: "GW_CS_REMOVE_NODES_CFM", req: Some(0x0106), ..CFM },
    CommandDescriptor { id: 0x0108, name: "GW_CS_VIRGIN_STATE_REQ", encode: Some(params::empty), ..REQ },
    CommandDescriptor { id: 0x0109, name: "GW_CS_VIRGIN_STATE_CFM", req: Some(0x0108), ..CFM },
    CommandDescriptor { id: 0x010A, name: "GW_CS_CONTROLLER_COPY_REQ", spawns_stream: true, ..REQ },
    CommandDescriptor { id: 0x010B, name: "GW_CS_CONTROLLER_COPY_CFM", req: Some(0x010A), ..CFM },
    CommandDescriptor { id: 0x010C, name: "GW_CS_CONTROLLER_COPY_NTF", req: Some(0x010A), is_session_terminator: true, ..NTF },
    CommandDescriptor { id: 0x010D, name: "GW_CS_CONTROLLER_COPY_CANCEL_NTF", req: Some(0x010A), ..NTF },
    CommandDescriptor { id: 0x010E, name: "GW_CS_RECEIVE_KEY_REQ", spawns_stream: true, ..REQ },
    CommandDescriptor { id: 0x010F, name: "GW_CS_RECEIVE_KEY_CFM", req: Some(0x010E), ..CFM },
    CommandDescriptor { id: 0x0110, name: "GW_CS_RECEIVE_KEY_NTF", req: Some(0x010E), is_session_terminator: true, ..NTF },
    CommandDescriptor { id: 0x0111, name: "GW_CS_PGC_JOB_NTF", ..NTF },
    CommandDescriptor { id: 0x0112, name: "GW_CS_SYSTEM_TABLE_UPDATE_NTF", ..NTF },
    CommandDescriptor { id: 0x0113, name: "GW_CS_GENERATE_NEW_KEY_REQ", spawns_stream: true, ..REQ },
    CommandDescriptor { id: 0x0114, name: "GW_CS_GENERATE_NEW_KEY_CFM", req: Some(0x0113), ..CFM },
    CommandDescriptor { id: 0x0115, name: "GW_CS_GENERATE_NEW_KEY_NTF", req: Some(0x0113), is_session_terminator: true, ..NTF },
    CommandDescriptor { id: 0x0116, name: "GW_CS_REPAIR_KEY_REQ", spawns_stream: true, ..REQ },
    CommandDescriptor { id: 0x0117, name: "GW_CS_REPAIR_KEY_CFM", req: Some(0x0116), ..CFM },
    CommandDescriptor { id: 0x0118, name: "GW_CS_REPAIR_KEY_NTF", req: Some(0x0116), is_session_terminator: true, ..NTF },
    CommandDescriptor { id: 0x0119, name: "GW_CS_ACTIVATE_CONFIGURATION_MODE_REQ", ..REQ },
    CommandDescriptor { id: 0x011A, name: "GW_CS_ACTIVATE_CONFIGURATION_MODE_CFM", req: Some(0x0119), ..CFM },
    // Node information.
    CommandDescriptor { id: 0x0200, name: "GW_GET_NODE_INFORMATION_REQ", encode: Some(params::get_node_information), spawns_stream: true, ..REQ },
    CommandDescriptor { id: 0x0201, name: "GW_GET_NODE_INFORMATION_CFM", req: Some(0x0200), decode: Some(decode::node_information_cfm), ..CFM },
    CommandDescriptor { id: 0x0210, name: "GW_GET_NODE_INFORMATION_NTF", req: Some(0x0200), decode: Some(decode::node_information_ntf), ..NTF },
    CommandDescriptor { id: 0x0202, name: "GW_GET_ALL_NODES_INFORMATION_REQ", encode: Some(params::empty), spawns_stream: true, ..REQ },
    CommandDescriptor { id: 0x0203, name: "GW_GET_ALL_NODES_INFORMATION_CFM", req: Some(0x0202), decode: Some(decode::all_nodes_cfm), ..CFM },
    CommandDescriptor { id: 0x0204, name: "GW_GET_ALL_NODES_INFORMATION_NTF", req: Some(0x0202), decode: Some(decode::all_nodes_ntf), ..NTF },
    CommandDescriptor { id: 0x0205, name: "GW_GET_ALL_NODES_INFORMATION_FINISHED_NTF", req: Some(0x0202), is_session_terminator: true, ..NTF },
    CommandDescriptor { id: 0x0206, name: "GW_SET_NODE_VARIATION_REQ", ..REQ },
    CommandDescriptor { id: 0x0207, name: "GW_SET_NODE_VARIATION_CFM", req: Some(0x0206), ..CFM },
    CommandDescriptor { id: 0x0208, name: "GW_SET_NODE_NAME_REQ", ..REQ },
    CommandDescriptor { id: 0x0209, name: "GW_SET_NODE_NAME_CFM", req: Some(0x0208), ..CFM },
    CommandDescriptor { id: 0x020A, name: "GW_SET_NODE_VELOCITY_REQ", ..REQ },
    CommandDescriptor { id: 0x020B, name: "GW_SET_NODE_VELOCITY_CFM", req: Some(0x020A), ..CFM },
    CommandDescriptor { id: 0x020C, name: "GW_NODE_INFORMATION_CHANGED_NTF", ..NTF },
    CommandDescriptor { id: 0x020D, name: "GW_SET_NODE_ORDER_AND_PLACEMENT_REQ", ..REQ },
    CommandDescriptor { id: 0x020E, name: "GW_SET_NODE_ORDER_AND_PLACEMENT_CFM", req: Some(0x020D), ..CFM },
    CommandDescriptor { id: 0x0211, name: "GW_NODE_STATE_POSITION_CHANGED_NTF", decode: Some(decode::node_position_changed_ntf), ..NTF },
    // Group information.
    CommandDescriptor { id: 0x0220, name: "GW_GET_GROUP_INFORMATION_REQ", encode: Some(params::get_group_information), spawns_stream: true, ..REQ },
    CommandDescriptor { id: 0x0221, name: "GW_GET_GROUP_INFORMATION_CFM", req: Some(0x0220), decode: Some(decode::group_information_cfm), ..CFM },
    CommandDescriptor { id: 0x0230, name: "GW_GET_GROUP_INFORMATION_NTF", req: Some(0x0220), decode: Some(decode::group_information_ntf), ..NTF },
    CommandDescriptor { id: 0x0222, name: "GW_SET_GROUP_INFORMATION_REQ", ..REQ },
    CommandDescriptor { id: 0x0223, name: "GW_SET_GROUP_INFORMATION_CFM", req: Some(0x0222), ..CFM },
    CommandDescriptor { id: 0x0224, name: "GW_GROUP_INFORMATION_CHANGED_NTF", ..NTF },
    CommandDescriptor { id: 0x0225, name: "GW_DELETE_GROUP_REQ", ..REQ },
    CommandDescriptor { id: 0x0226, name: "GW_DELETE_GROUP_CFM", req: Some(0x0225), ..CFM },
    CommandDescriptor { id: 0x0227, name: "GW_NEW_GROUP_REQ", ..REQ },
    CommandDescriptor { id: 0x0228, name: "GW_NEW_GROUP_CFM", req: Some(0x0227), ..CFM },
    CommandDescriptor { id: 0x0229, name: "GW_GET_ALL_GROUPS_INFORMATION_REQ", encode: Some(params::get_all_groups_information), spawns_stream: true, ..REQ },
    CommandDescriptor { id: 0x022A, name: "GW_GET_ALL_GROUPS_INFORMATION_CFM", req: Some(0x0229), decode: Some(decode::all_groups_cfm), ..CFM },
    CommandDescriptor { id: 0x022B, name: "GW_GET_ALL_GROUPS_INFORMATION_NTF", req: Some(0x0229), decode: Some(decode::all_groups_ntf), ..NTF },
    CommandDescriptor { id: 0x022C, name: "GW_GET_ALL_GROUPS_INFORMATION_FINISHED_NTF", req: Some(0x0229), is_session_terminator: true, ..NTF },
    CommandDescriptor { id: 0x022D, name: "GW_GROUP_DELETED_NTF", ..NTF },
    // House status monitor.
    CommandDescriptor { id: 0x0240, name: "GW_HOUSE_STATUS_MONITOR_ENABLE_REQ", encode: Some(params::empty), ..REQ },
    CommandDescriptor { id: 0x0241, name: "GW_HOUSE_STATUS_MONITOR_ENABLE_CFM", req: Some(0x0240), ..CFM },
    CommandDescriptor { id: 0x0242, name: "GW_HOUSE_STATUS_MONITOR_DISABLE_REQ", encode: Some(params::empty), ..REQ },
    CommandDescriptor { id: 0x0243, name: "GW_HOUSE_STATUS_MONITOR_DISABLE_CFM", req: Some(0x0242), ..CFM },
    // Command handler sessions.
    CommandDescriptor { id: 0x0300, name: "GW_COMMAND_SEND_REQ", encode: Some(params::command_send), carries_session: true, spawns_stream: true, ..REQ },
    CommandDescriptor { id: 0x0301, name: "GW_COMMAND_SEND_CFM", req: Some(0x0300), decode: Some(decode::session_accept_cfm), ..CFM },
    CommandDescriptor { id: 0x0302, name: "GW_COMMAND_RUN_STATUS_NTF", req: Some(0x0300), decode: Some(decode::run_status_ntf), ..NTF },
    CommandDescriptor { id: 0x0303, name: "GW_COMMAND_REMAINING_TIME_NTF", req: Some(0x0300), decode: Some(decode::remaining_time_ntf), ..NTF },
    CommandDescriptor { id: 0x0304, name: "GW_SESSION_FINISHED_NTF", req: Some(0x0300), decode: Some(decode::session_finished_ntf), is_session_terminator: true, ..NTF },
    CommandDescriptor { id: 0x0305, name: "GW_STATUS_REQUEST_REQ", encode: Some(params::status_request), carries_session: true, spawns_stream: true, ..REQ },
    CommandDescriptor { id: 0x0306, name: "GW_STATUS_REQUEST_CFM", req: Some(0x0305), decode: Some(decode::session_accept_cfm), ..CFM },
    CommandDescriptor { id: 0x0307, name: "GW_STATUS_REQUEST_NTF", req: Some(0x0305), decode: Some(decode::status_request_ntf), ..NTF },
    CommandDescriptor { id: 0x0308, name: "GW_WINK_SEND_REQ", encode: Some(params::wink_send), carries_session: true, spawns_stream: true, ..REQ },
    CommandDescriptor { id: 0x0309, name: "GW_WINK_SEND_CFM", req: Some(0x0308), decode: Some(decode::session_accept_cfm), ..CFM },
    CommandDescriptor { id: 0x030A, name: "GW_WINK_SEND_NTF", req: Some(0x0308), decode: Some(decode::wink_ntf), ..NTF },
    CommandDescriptor { id: 0x0310, name: "GW_SET_LIMITATION_REQ", carries_session: true, spawns_stream: true, ..REQ },
    CommandDescriptor { id: 0x0311, name: "GW_SET_LIMITATION_CFM", req: Some(0x0310), ..CFM },
    CommandDescriptor { id: 0x0312, name: "GW_GET_LIMITATION_STATUS_REQ", carries_session: true, spawns_stream: true, ..REQ },
    CommandDescriptor { id: 0x0313, name: "GW_GET_LIMITATION_STATUS_CFM", req: Some(0x0312), ..CFM },
    CommandDescriptor { id: 0x0314, name: "GW_LIMITATION_STATUS_NTF", req: Some(0x0312), ..NTF },
    CommandDescriptor { id: 0x0320, name: "GW_MODE_SEND_REQ", carries_session: true, spawns_stream: true, ..REQ },
    CommandDescriptor { id: 0x0321, name: "GW_MODE_SEND_CFM", req: Some(0x0320), ..CFM },
    CommandDescriptor { id: 0x0322, name: "GW_MODE_SEND_NTF", req: Some(0x0320), ..NTF },
    // Scenes.
    CommandDescriptor { id: 0x0400, name: "GW_INITIALIZE_SCENE_REQ", spawns_stream: true, ..REQ },
    CommandDescriptor { id: 0x0401, name: "GW_INITIALIZE_SCENE_CFM", req: Some(0x0400), ..CFM },
    CommandDescriptor { id: 0x0402, name: "GW_INITIALIZE_SCENE_NTF", req: Some(0x0400), is_session_terminator: true, ..NTF },
    CommandDescriptor { id: 0x0403, name: "GW_INITIALIZE_SCENE_CANCEL_REQ", encode: Some(params::empty), ..REQ },
    CommandDescriptor { id: 0x0404, name: "GW_INITIALIZE_SCENE_CANCEL_CFM", req: Some(0x0403), ..CFM },
    CommandDescriptor { id: 0x0405, name: "GW_RECORD_SCENE_REQ", spawns_stream: true, ..REQ },
    CommandDescriptor { id: 0x0406, name: "GW_RECORD_SCENE_CFM", req: Some(0x0405), ..CFM },
    CommandDescriptor { id: 0x0407, name: "GW_RECORD_SCENE_NTF", req: Some(0x0405), is_session_terminator: true, ..NTF },
    CommandDescriptor { id: 0x0408, name: "GW_DELETE_SCENE_REQ", ..REQ },
    CommandDescriptor { id: 0x0409, name: "GW_DELETE_SCENE_CFM", req: Some(0x0408), ..CFM },
    CommandDescriptor { id: 0x040A, name: "GW_RENAME_SCENE_REQ", ..REQ },
    CommandDescriptor { id: 0x040B, name: "GW_RENAME_SCENE_CFM", req: Some(0x040A), ..CFM },
    CommandDescriptor { id: 0x040C, name: "GW_GET_SCENE_LIST_REQ", encode: Some(params::empty), spawns_stream: true, ..REQ },
    CommandDescriptor { id: 0x040D, name: "GW_GET_SCENE_LIST_CFM", req: Some(0x040C), decode: Some(decode::scene_list_cfm), ..CFM },
    CommandDescriptor { id: 0x040E, name: "GW_GET_SCENE_LIST_NTF", req: Some(0x040C), decode: Some(decode::scene_list_ntf), ..NTF },
    CommandDescriptor { id: 0x040F, name: "GW_GET_SCENE_INFORMATION_REQ", ..REQ },
    CommandDescriptor { id: 0x0410, name: "GW_GET_SCENE_INFORMATION_CFM", req: Some(0x040F), ..CFM },
    CommandDescriptor { id: 0x0411, name: "GW_GET_SCENE_INFORMATION_NTF", req: Some(0x040F), ..NTF },
    CommandDescriptor { id: 0x0412, name: "GW_ACTIVATE_SCENE_REQ", encode: Some(params::activate_scene), carries_session: true, spawns_stream: true, ..REQ },
    CommandDescriptor { id: 0x0413, name: "GW_ACTIVATE_SCENE_CFM", req: Some(0x0412), decode: Some(decode::scene_session_cfm), session_offset: 1, ..CFM },
    CommandDescriptor { id: 0x0415, name: "GW_STOP_SCENE_REQ", encode: Some(params::stop_scene), carries_session: true, spawns_stream: true, ..REQ },
    CommandDescriptor { id: 0x0416, name: "GW_STOP_SCENE_CFM", req: Some(0x0415), decode: Some(decode::scene_session_cfm), session_offset: 1, ..CFM },
    CommandDescriptor { id: 0x0419, name: "GW_SCENE_INFORMATION_CHANGED_NTF", ..NTF },
    // Product groups.
    CommandDescriptor { id: 0x0447, name: "GW_ACTIVATE_PRODUCTGROUP_REQ", encode: Some(params::activate_productgroup), carries_session: true, spawns_stream: true, ..REQ },
    CommandDescriptor { id: 0x0448, name: "GW_ACTIVATE_PRODUCTGROUP_CFM", req: Some(0x0447), decode: Some(decode::productgroup_cfm), ..CFM },
    CommandDescriptor { id: 0x0449, name: "GW_ACTIVATE_PRODUCTGROUP_NTF", req: Some(0x0447), ..NTF },
    // Contact input links.
    CommandDescriptor { id: 0x0460, name: "GW_GET_CONTACT_INPUT_LINK_LIST_REQ", encode: Some(params::empty), ..REQ },
    CommandDescriptor { id: 0x0461, name: "GW_GET_CONTACT_INPUT_LINK_LIST_CFM", req: Some(0x0460), ..CFM },
    CommandDescriptor { id: 0x0462, name: "GW_SET_CONTACT_INPUT_LINK_REQ", ..REQ },
    CommandDescriptor { id: 0x0463, name: "GW_SET_CONTACT_INPUT_LINK_CFM", req: Some(0x0462), ..CFM },
    CommandDescriptor { id: 0x0464, name: "GW_REMOVE_CONTACT_INPUT_LINK_REQ", ..REQ },
    CommandDescriptor { id: 0x0465, name: "GW_REMOVE_CONTACT_INPUT_LINK_CFM", req: Some(0x0464), ..CFM },
    // Activation log.
    CommandDescriptor { id: 0x0500, name: "GW_GET_ACTIVATION_LOG_HEADER_REQ", encode: Some(params::empty), ..REQ },
    CommandDescriptor { id: 0x0501, name: "GW_GET_ACTIVATION_LOG_HEADER_CFM", req: Some(0x0500), ..CFM },
    CommandDescriptor { id: 0x0502, name: "GW_CLEAR_ACTIVATION_LOG_REQ", encode: Some(params::empty), ..REQ },
    CommandDescriptor { id: 0x0503, name: "GW_CLEAR_ACTIVATION_LOG_CFM", req: Some(0x0502), ..CFM },
    CommandDescriptor { id: 0x0504, name: "GW_GET_ACTIVATION_LOG_LINE_REQ", ..REQ },
    CommandDescriptor { id: 0x0505, name: "GW_GET_ACTIVATION_LOG_LINE_CFM", req: Some(0x0504), ..CFM },
    CommandDescriptor { id: 0x0506, name: "GW_ACTIVATION_LOG_UPDATED_NTF", ..NTF },
    CommandDescriptor { id: 0x0507, name: "GW_GET_MULTIPLE_ACTIVATION_LOG_LINES_REQ", ..REQ },
    CommandDescriptor { id: 0x0508, name: "GW_GET_MULTIPLE_ACTIVATION_LOG_LINES_NTF", req: Some(0x0507), ..NTF },
    CommandDescriptor { id: 0x0509, name: "GW_GET_MULTIPLE_ACTIVATION_LOG_LINES_CFM", req: Some(0x0507), ..CFM },
    // Clock.
    CommandDescriptor { id: 0x2000, name: "GW_SET_UTC_REQ", encode: Some(params::set_utc), ..REQ },
    CommandDescriptor { id: 0x2001, name: "GW_SET_UTC_CFM", req: Some(0x2000), ..CFM },
    CommandDescriptor { id: 0x2002, name: "GW_RTC_SET_TIME_ZONE_REQ", encode: Some(params::rtc_set_time_zone), ..REQ },
    CommandDescriptor { id: 0x2003, name: "GW_RTC_SET_TIME_ZONE_CFM", req: Some(0x2002), ..CFM },
    CommandDescriptor { id: 0x2004, name: "GW_GET_LOCAL_TIME_REQ", encode: Some(params::empty), ..REQ },
    CommandDescriptor { id: 0x2005, name: "GW_GET_LOCAL_TIME_CFM", req: Some(0x2004), decode: Some(decode::local_time_cfm), ..CFM },
    // Authentication.
    CommandDescriptor { id: 0x3000, name: "GW_PASSWORD_ENTER_REQ", encode: Some(params::password_enter), ..REQ },
    CommandDescriptor { id: 0x3001, name: "GW_PASSWORD_ENTER_CFM", req: Some(0x3000), decode: Some(decode::password_enter_cfm), ..CFM },
    CommandDescriptor { id: 0x3002, name: "GW_PASSWORD_CHANGE_REQ", encode: Some(params::password_change), ..REQ },
    CommandDescriptor { id: 0x3003, name: "GW_PASSWORD_CHANGE_CFM", req: Some(0x3002), decode: Some(decode::password_change_cfm), ..CFM },
    CommandDescriptor { id: 0x3004, name: "GW_PASSWORD_CHANGE_NTF", req: Some(0x3002), decode: Some(decode::password_change_ntf), ..NTF },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_ntf_id() {
        assert_eq!(ERROR_NTF, 0x0000);
        assert_eq!(COMMANDS[0].name, "GW_ERROR_NTF");
    }

    #[test]
    fn test_terminators_reference_stream_requests() {
        for cmd in COMMANDS {
            if cmd.is_session_terminator {
                let req_id = cmd.req.expect("terminator without request linkage");
                let req = COMMANDS.iter().find(|c| c.id == req_id).unwrap();
                assert!(req.spawns_stream, "{} terminates a non-stream", cmd.name);
            }
        }
    }

    #[test]
    fn test_scene_confirmations_use_offset_session_id() {
        for name in ["GW_ACTIVATE_SCENE_CFM", "GW_STOP_SCENE_CFM"] {
            let cmd = COMMANDS.iter().find(|c| c.name == name).unwrap();
            assert_eq!(cmd.session_offset, 1);
        }
    }
}
