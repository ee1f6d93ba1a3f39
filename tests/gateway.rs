//! End-to-end tests against a scripted fake gateway.
//!
//! The gateway side of each test drives the other half of an in-memory
//! duplex stream: it reads SLIP frames the engine writes and answers
//! with scripted confirmation and notification frames.

use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::time::timeout;

use klf200::protocol::{decode_frame, encode_frame, FrameBuffer};
use klf200::{slip, CommandData, Config, Connection, Error, Event, State};

fn test_config() -> Config {
    Config::new("gateway.test", "abc")
        .confirmation_timeout(Duration::from_millis(500))
        .stream_timeout(Duration::from_secs(2))
}

fn pair() -> (Connection, DuplexStream) {
    let (client, server) = tokio::io::duplex(4096);
    (Connection::open(client, test_config()), server)
}

/// Read exactly `len` raw bytes from the gateway side.
async fn gw_read_exact(server: &mut DuplexStream, len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    server.read_exact(&mut buf).await.expect("gateway read");
    buf
}

/// Read and decode one frame from the gateway side.
async fn gw_read_frame(server: &mut DuplexStream) -> (u16, Vec<u8>) {
    let mut buffer = FrameBuffer::new();
    let mut buf = [0u8; 1024];
    loop {
        let n = server.read(&mut buf).await.expect("gateway read");
        assert!(n > 0, "stream closed while waiting for a frame");
        let chunks = buffer.push(&buf[..n]).expect("framing");
        if let Some(chunk) = chunks.into_iter().next() {
            let decoded = slip::decode(&chunk).expect("slip");
            let frame = decode_frame(&decoded, true).expect("frame");
            return (frame.command(), frame.payload().to_vec());
        }
    }
}

/// Send one frame from the gateway side.
async fn gw_send(server: &mut DuplexStream, command: u16, payload: &[u8]) {
    let frame = encode_frame(command, payload).expect("encode");
    server
        .write_all(&slip::encode(&frame))
        .await
        .expect("gateway write");
}

#[tokio::test]
async fn password_success_produces_expected_frame_and_authenticates() {
    let (conn, mut server) = pair();

    let gateway = tokio::spawn(async move {
        // GW_PASSWORD_ENTER_REQ with password "abc":
        // C0 00 23 30 00 61 62 63 00*29 73 C0 (39 bytes, no escapes).
        let mut expected = vec![0xC0, 0x00, 0x23, 0x30, 0x00, 0x61, 0x62, 0x63];
        expected.extend(std::iter::repeat(0x00).take(29));
        expected.push(0x73);
        expected.push(0xC0);

        let wire = gw_read_exact(&mut server, expected.len()).await;
        assert_eq!(wire, expected);

        gw_send(&mut server, 0x3001, &[0]).await;
        server
    });

    conn.authenticate().await.expect("authentication");
    assert_eq!(conn.state(), State::Authenticated);

    gateway.await.unwrap();
    conn.disconnect().await;
}

#[tokio::test]
async fn password_failure_is_fatal() {
    let (conn, mut server) = pair();

    let gateway = tokio::spawn(async move {
        let (command, _) = gw_read_frame(&mut server).await;
        assert_eq!(command, 0x3000);
        gw_send(&mut server, 0x3001, &[1]).await;
        server
    });

    let err = conn.authenticate().await.expect_err("must fail");
    assert!(matches!(err, Error::AuthenticationFailed));
    assert_eq!(conn.state(), State::Disconnected);

    gateway.await.unwrap();
}

#[tokio::test]
async fn protocol_version_renders_major_dot_minor() {
    let (conn, mut server) = pair();

    let gateway = tokio::spawn(async move {
        let (command, payload) = gw_read_frame(&mut server).await;
        assert_eq!(command, 0x000A);
        assert!(payload.is_empty());
        gw_send(&mut server, 0x000B, &[0x00, 0x03, 0x00, 0x12]).await;
        server
    });

    let version = conn
        .get_protocol_version()
        .await
        .unwrap()
        .expect("protocol version");
    assert_eq!(version.to_string(), "3.18");
    assert_eq!(
        serde_json::to_value(version).unwrap(),
        Value::String("3.18".into())
    );

    gateway.await.unwrap();
    conn.disconnect().await;
}

#[tokio::test]
async fn system_table_stream_accumulates_pages_in_order() {
    let (conn, mut server) = pair();

    let gateway = tokio::spawn(async move {
        let (command, _) = gw_read_frame(&mut server).await;
        assert_eq!(command, 0x0100);

        // Empty informational confirmation.
        gw_send(&mut server, 0x0101, &[]).await;

        let entry = |index: u8| {
            let mut e = vec![index];
            e.extend([0x00, 0x00, index + 1]); // address
            e.extend(0x0140u16.to_be_bytes()); // actuator type
            e.extend([5, 1, 0, 0, 0]); // power, manufacturer, backbone
            e
        };

        // Two entries, one remaining.
        let mut page1 = vec![2u8];
        page1.extend(entry(0));
        page1.extend(entry(1));
        page1.push(1);
        gw_send(&mut server, 0x0102, &page1).await;

        // Final entry, zero remaining.
        let mut page2 = vec![1u8];
        page2.extend(entry(2));
        page2.push(0);
        gw_send(&mut server, 0x0102, &page2).await;
        server
    });

    let result = conn
        .request("GW_CS_GET_SYSTEMTABLE_DATA_REQ", Value::Null)
        .await
        .unwrap()
        .expect("system table");

    match result {
        CommandData::List(entries) => {
            assert_eq!(entries.len(), 3);
            for (i, entry) in entries.iter().enumerate() {
                match entry {
                    CommandData::SystemTableEntry(entry) => {
                        assert_eq!(entry.index as usize, i);
                        assert_eq!(entry.address as usize, i + 1);
                    }
                    other => panic!("unexpected entry: {other:?}"),
                }
            }
        }
        other => panic!("unexpected result: {other:?}"),
    }

    gateway.await.unwrap();
    conn.disconnect().await;
}

#[tokio::test]
async fn command_send_session_accumulates_run_statuses() {
    let (conn, mut server) = pair();

    let gateway = tokio::spawn(async move {
        let (command, payload) = gw_read_frame(&mut server).await;
        assert_eq!(command, 0x0300);
        // First session on a fresh connection.
        assert_eq!(&payload[..2], &[0x00, 0x01]);
        // Main parameter carries the requested position.
        assert_eq!(&payload[7..9], &0x0000u16.to_be_bytes());

        gw_send(&mut server, 0x0301, &[0x00, 0x01, 1]).await;

        let run_status = |node: u8| {
            let mut p = vec![0x00, 0x01, 1, node, 0];
            p.extend(0x0000u16.to_be_bytes());
            p.extend([0u8, 1]);
            p.extend(0u32.to_be_bytes());
            p
        };
        gw_send(&mut server, 0x0302, &run_status(2)).await;
        gw_send(&mut server, 0x0302, &run_status(3)).await;
        gw_send(&mut server, 0x0304, &[0x00, 0x01]).await;
        server
    });

    let result = conn
        .request(
            "GW_COMMAND_SEND_REQ",
            json!({"position": 0, "nodeIds": [2, 3]}),
        )
        .await
        .unwrap()
        .expect("command result");

    match result {
        CommandData::List(items) => {
            assert_eq!(items.len(), 2);
            match (&items[0], &items[1]) {
                (CommandData::RunStatus(first), CommandData::RunStatus(second)) => {
                    assert_eq!(first.node_id, 2);
                    assert_eq!(second.node_id, 3);
                }
                other => panic!("unexpected items: {other:?}"),
            }
        }
        other => panic!("unexpected result: {other:?}"),
    }

    assert_eq!(conn.outstanding_requests(), 0);
    gateway.await.unwrap();
    conn.disconnect().await;
}

#[tokio::test]
async fn concurrent_non_session_calls_serialize_on_the_wire() {
    let (conn, mut server) = pair();

    let gateway = tokio::spawn(async move {
        let version = [0u8, 2, 0, 0, 71, 0, 5, 14, 3];

        let (command, _) = gw_read_frame(&mut server).await;
        assert_eq!(command, 0x0008);

        // The second request must not hit the wire while the first is
        // outstanding.
        let second = timeout(Duration::from_millis(250), gw_read_frame(&mut server)).await;
        assert!(second.is_err(), "second request sent before first completed");

        gw_send(&mut server, 0x0009, &version).await;

        // Now the second caller is released.
        let (command, _) = gw_read_frame(&mut server).await;
        assert_eq!(command, 0x0008);
        gw_send(&mut server, 0x0009, &version).await;
        server
    });

    let (first, second) = tokio::join!(conn.get_version(), conn.get_version());
    assert!(first.unwrap().is_some());
    assert!(second.unwrap().is_some());

    gateway.await.unwrap();
    conn.disconnect().await;
}

#[tokio::test]
async fn node_information_completes_on_notification() {
    let (conn, mut server) = pair();

    let gateway = tokio::spawn(async move {
        let (command, payload) = gw_read_frame(&mut server).await;
        assert_eq!(command, 0x0200);
        assert_eq!(payload, [7]);

        gw_send(&mut server, 0x0201, &[0, 7]).await;

        let mut record = vec![0u8; 124];
        record[0] = 7;
        record[4..10].copy_from_slice(b"Window");
        record[85..87].copy_from_slice(&0x6400u16.to_be_bytes());
        gw_send(&mut server, 0x0210, &record).await;
        server
    });

    let result = conn
        .request("GW_GET_NODE_INFORMATION_REQ", json!({"nodeId": 7}))
        .await
        .unwrap()
        .expect("node record");

    match result {
        CommandData::Node(node) => {
            assert_eq!(node.node_id, 7);
            assert_eq!(node.name, "Window");
            assert_eq!(node.current_position, klf200::Position::Percent(50));
        }
        other => panic!("unexpected result: {other:?}"),
    }

    gateway.await.unwrap();
    conn.disconnect().await;
}

#[tokio::test]
async fn invalid_node_id_fails_observationally() {
    let (conn, mut server) = pair();
    let mut events = conn.subscribe();

    let gateway = tokio::spawn(async move {
        let (command, _) = gw_read_frame(&mut server).await;
        assert_eq!(command, 0x0200);
        // Status 2: invalid node index.
        gw_send(&mut server, 0x0201, &[2, 0]).await;
        server
    });

    let result = conn
        .request("GW_GET_NODE_INFORMATION_REQ", json!({"nodeId": 42}))
        .await
        .unwrap();
    assert!(result.is_none());

    let (message, req) = loop {
        match timeout(Duration::from_secs(1), events.recv())
            .await
            .expect("event")
            .expect("recv")
        {
            Event::Error { message, req } => break (message, req),
            _ => continue,
        }
    };
    assert!(message.contains("invalid node id"));
    assert_eq!(req.unwrap().name, "GW_GET_NODE_INFORMATION_REQ");

    // The connection stays usable after a domain error.
    assert_ne!(conn.state(), State::Disconnected);

    gateway.await.unwrap();
    conn.disconnect().await;
}

#[tokio::test]
async fn broadcast_position_change_reaches_subscribers() {
    let (conn, mut server) = pair();
    let mut events = conn.subscribe();

    let mut payload = vec![9u8, 4];
    payload.extend(0x6400u16.to_be_bytes()); // current: 50%
    payload.extend(0xC800u16.to_be_bytes()); // target: 100%
    payload.extend([0xF7, 0xFF].repeat(4)); // FP1-4 unknown
    payload.extend(10u16.to_be_bytes());
    payload.extend(0u32.to_be_bytes());
    gw_send(&mut server, 0x0211, &payload).await;

    let notification = loop {
        match timeout(Duration::from_secs(1), events.recv())
            .await
            .expect("event")
            .expect("recv")
        {
            Event::Notification(ntf) => break ntf,
            _ => continue,
        }
    };

    assert_eq!(notification.name, "GW_NODE_STATE_POSITION_CHANGED_NTF");
    assert!(notification.req.is_none());
    match notification.payload.expect("decoded payload") {
        CommandData::NodePosition(change) => {
            assert_eq!(change.node_id, 9);
            assert_eq!(change.current_position, klf200::Position::Percent(50));
            assert_eq!(change.target_position, klf200::Position::Percent(100));
        }
        other => panic!("unexpected payload: {other:?}"),
    }

    conn.disconnect().await;
}

#[tokio::test]
async fn scene_list_streams_like_the_system_table() {
    let (conn, mut server) = pair();

    let gateway = tokio::spawn(async move {
        let (command, _) = gw_read_frame(&mut server).await;
        assert_eq!(command, 0x040C);

        gw_send(&mut server, 0x040D, &[2]).await;

        let scene = |id: u8, name: &str| {
            let mut entry = vec![id];
            let mut field = [0u8; 64];
            field[..name.len()].copy_from_slice(name.as_bytes());
            entry.extend_from_slice(&field);
            entry
        };

        let mut page1 = vec![1u8];
        page1.extend(scene(0, "Morning"));
        page1.push(1);
        gw_send(&mut server, 0x040E, &page1).await;

        let mut page2 = vec![1u8];
        page2.extend(scene(1, "Night"));
        page2.push(0);
        gw_send(&mut server, 0x040E, &page2).await;
        server
    });

    let result = conn
        .request("GW_GET_SCENE_LIST_REQ", Value::Null)
        .await
        .unwrap()
        .expect("scene list");

    match result {
        CommandData::List(scenes) => {
            assert_eq!(scenes.len(), 2);
            match (&scenes[0], &scenes[1]) {
                (CommandData::Scene(first), CommandData::Scene(second)) => {
                    assert_eq!(first.name, "Morning");
                    assert_eq!(second.name, "Night");
                }
                other => panic!("unexpected scenes: {other:?}"),
            }
        }
        other => panic!("unexpected result: {other:?}"),
    }

    gateway.await.unwrap();
    conn.disconnect().await;
}

#[tokio::test]
async fn transport_close_fails_pending_request() {
    let (conn, server) = pair();

    let requester = {
        let conn = conn.clone();
        tokio::spawn(async move { conn.request("GW_GET_VERSION_REQ", Value::Null).await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    drop(server);

    let result = requester.await.unwrap().unwrap();
    assert!(result.is_none());

    // The read loop notices the close and tears the connection down.
    timeout(Duration::from_secs(1), async {
        while conn.state() != State::Disconnected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("teardown");
}

#[tokio::test]
async fn checksum_mismatch_is_tolerated_by_default() {
    let (conn, mut server) = pair();

    let gateway = tokio::spawn(async move {
        let (command, _) = gw_read_frame(&mut server).await;
        assert_eq!(command, 0x000A);

        // Corrupt the checksum; the engine should warn and process.
        let mut frame = encode_frame(0x000B, &[0x00, 0x03, 0x00, 0x12]).unwrap();
        let last = frame.len() - 1;
        frame[last] ^= 0xFF;
        server.write_all(&slip::encode(&frame)).await.unwrap();
        server
    });

    let version = conn
        .get_protocol_version()
        .await
        .unwrap()
        .expect("tolerated frame");
    assert_eq!(version.to_string(), "3.18");

    gateway.await.unwrap();
    conn.disconnect().await;
}
