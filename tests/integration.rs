//! Integration tests for fathom-client.
//!
//! These tests drive the client end to end against scripted servers:
//! in-memory transports for RPC semantics, and a real WebSocket handshake
//! over an in-memory duplex pipe for the transport stack.

use std::collections::HashSet;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::io::DuplexStream;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, client_async};

use fathom_client::transport::{mem, MemPeer, WsTransport};
use fathom_client::{Client, ConnectionState, ErrorContext, FathomError};

/// A session wired to an in-memory peer, already connected.
fn connected_client() -> (Client, MemPeer) {
    let (transport, peer) = mem::pair();
    let mut db = Client::new("mem://test");
    db.connect_with(transport).unwrap();
    (db, peer)
}

/// Answer the next request with a success result; yields the captured frame.
fn respond_once(mut peer: MemPeer, result: Value) -> JoinHandle<Value> {
    tokio::spawn(async move {
        let frame = peer.recv().await.unwrap();
        peer.push(json!({"id": frame["id"], "result": result}));
        frame
    })
}

/// Answer the next request with a server error envelope.
fn fail_once(mut peer: MemPeer, code: i64, message: &str) -> JoinHandle<()> {
    let message = message.to_string();
    tokio::spawn(async move {
        let _ = peer.recv().await.unwrap();
        peer.push(json!({"error": {"code": code, "message": message}}));
    })
}

/// Calls outside the `Connected` state fail locally, touching no transport.
#[tokio::test]
async fn test_calls_gated_outside_connected() {
    // Connecting: no transport attached yet
    let mut db = Client::new("ws://localhost:8000/rpc");
    let err = db.ping().await.unwrap_err();
    assert!(matches!(err, FathomError::NotConnected));

    // Disconnected: transport released, nothing was ever sent
    let (transport, mut peer) = mem::pair();
    let mut db = Client::new("mem://test");
    db.connect_with(transport).unwrap();
    db.close().await;

    let err = db.ping().await.unwrap_err();
    assert!(matches!(err, FathomError::NotConnected));
    assert!(peer.try_recv().is_none());
}

/// A failed `connect` leaves the session in `Connecting`.
#[tokio::test]
async fn test_connect_invalid_address_is_connection_error() {
    let mut db = Client::new("not a url");
    let err = db.connect().await.unwrap_err();
    assert!(matches!(err, FathomError::Connection(_)));
    assert_eq!(db.state(), ConnectionState::Connecting);
}

/// Every call mints a fresh request id.
#[tokio::test]
async fn test_each_call_mints_a_fresh_id() {
    let (mut db, mut peer) = connected_client();

    let server = tokio::spawn(async move {
        let mut ids = Vec::new();
        for _ in 0..5 {
            let frame = peer.recv().await.unwrap();
            ids.push(frame["id"].as_str().unwrap().to_string());
            peer.push(json!({"id": frame["id"], "result": null}));
        }
        ids
    });

    for _ in 0..5 {
        db.info().await.unwrap();
    }

    let ids = server.await.unwrap();
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
}

/// `ping` sends the canonical three-field envelope and decodes the reply.
#[tokio::test]
async fn test_ping_sends_canonical_envelope() {
    let (mut db, peer) = connected_client();
    let server = respond_once(peer, json!(true));

    assert!(db.ping().await.unwrap());

    let frame = server.await.unwrap();
    assert_eq!(frame["method"], "ping");
    assert_eq!(frame["params"], json!([]));
    assert_eq!(frame["id"].as_str().unwrap().len(), 36);
    assert_eq!(frame.as_object().unwrap().len(), 3);
}

/// Result payloads come back unchanged, whatever their JSON shape.
#[tokio::test]
async fn test_result_payloads_round_trip_unchanged() {
    let cases = vec![
        json!(null),
        json!(42),
        json!(1.5),
        json!("text"),
        json!({"a": 1}),
        json!([1, 2, 3]),
        json!({"nested": {"list": [{"k": "v"}, null, 7]}}),
    ];

    for expected in cases {
        let (mut db, peer) = connected_client();
        let server = respond_once(peer, expected.clone());

        let result = db
            .call("select", vec![json!("person")], ErrorContext::Query)
            .await
            .unwrap();
        assert_eq!(result, expected);
        server.await.unwrap();
    }
}

/// Server errors on auth calls surface as `Authentication`.
#[tokio::test]
async fn test_auth_failure_classified_as_authentication() {
    let (mut db, peer) = connected_client();
    let server = fail_once(peer, 100, "bad auth");

    let err = db.signin(json!({"user": "x", "pass": "y"})).await.unwrap_err();
    match err {
        FathomError::Authentication { code, message } => {
            assert_eq!(code, 100);
            assert_eq!(message, "bad auth");
        }
        other => panic!("expected Authentication error, got {other:?}"),
    }
    server.await.unwrap();
}

/// Server errors on queries surface as `Protocol`.
#[tokio::test]
async fn test_query_failure_classified_as_protocol() {
    let (mut db, peer) = connected_client();
    let server = fail_once(peer, -32000, "parse error");

    let err = db.query("SELEC * FROM person", None).await.unwrap_err();
    assert!(matches!(err, FathomError::Protocol { code: -32000, .. }));
    server.await.unwrap();
}

/// Server errors on record mutations surface as `Permission`.
#[tokio::test]
async fn test_delete_failure_classified_as_permission() {
    let (mut db, peer) = connected_client();
    let server = fail_once(peer, 403, "not allowed");

    let err = db.delete("person:tobie").await.unwrap_err();
    assert!(matches!(err, FathomError::Permission { code: 403, .. }));
    server.await.unwrap();
}

/// A server-reported error leaves the session usable.
#[tokio::test]
async fn test_session_usable_after_server_error() {
    let (mut db, mut peer) = connected_client();

    let server = tokio::spawn(async move {
        let _ = peer.recv().await.unwrap();
        peer.push(json!({"error": {"code": -32000, "message": "no such table"}}));
        let frame = peer.recv().await.unwrap();
        peer.push(json!({"id": frame["id"], "result": true}));
    });

    assert!(db.select("missing").await.is_err());
    assert!(db.ping().await.unwrap());
    server.await.unwrap();
}

/// A channel failure surfaces as `Transport` and leaves state untouched.
#[tokio::test]
async fn test_transport_failure_leaves_state_connected() {
    let (mut db, mut peer) = connected_client();
    peer.shutdown();

    let err = db.ping().await.unwrap_err();
    assert!(matches!(err, FathomError::Transport(_)));
    assert_eq!(db.state(), ConnectionState::Connected);

    db.close().await;
    assert_eq!(db.state(), ConnectionState::Disconnected);
}

/// `select` sends exactly one parameter, the target.
#[tokio::test]
async fn test_select_sends_single_param() {
    let (mut db, peer) = connected_client();
    let server = respond_once(peer, json!([]));

    db.select("person").await.unwrap();

    let frame = server.await.unwrap();
    assert_eq!(frame["method"], "select");
    assert_eq!(frame["params"], json!(["person"]));
}

/// `assign` rides the `let` wire method with key and value params.
#[tokio::test]
async fn test_assign_uses_let_wire_method() {
    let (mut db, peer) = connected_client();
    let server = respond_once(peer, json!(null));

    db.assign("name", json!("Tobie")).await.unwrap();

    let frame = server.await.unwrap();
    assert_eq!(frame["method"], "let");
    assert_eq!(frame["params"], json!(["name", "Tobie"]));
}

/// `merge` and `patch` map to the `change` and `modify` wire methods.
#[tokio::test]
async fn test_merge_and_patch_wire_methods() {
    let (mut db, mut peer) = connected_client();

    let server = tokio::spawn(async move {
        let mut methods = Vec::new();
        for _ in 0..2 {
            let frame = peer.recv().await.unwrap();
            methods.push(frame["method"].as_str().unwrap().to_string());
            peer.push(json!({"id": frame["id"], "result": null}));
        }
        methods
    });

    db.merge("person:1", Some(json!({"age": 30}))).await.unwrap();
    db.patch(
        "person:1",
        Some(json!([{"op": "replace", "path": "/age", "value": 31}])),
    )
    .await
    .unwrap();

    assert_eq!(server.await.unwrap(), vec!["change", "modify"]);
}

/// A live query hands back its id, which `kill` then targets.
#[tokio::test]
async fn test_live_query_flow() {
    let (mut db, mut peer) = connected_client();

    let server = tokio::spawn(async move {
        let frame = peer.recv().await.unwrap();
        assert_eq!(frame["method"], "live");
        assert_eq!(frame["params"], json!(["person"]));
        peer.push(json!({"id": frame["id"], "result": "live-query-1"}));

        let frame = peer.recv().await.unwrap();
        assert_eq!(frame["method"], "kill");
        assert_eq!(frame["params"], json!(["live-query-1"]));
        peer.push(json!({"id": frame["id"], "result": null}));
    });

    let live_id = db.live("person").await.unwrap();
    assert_eq!(live_id, "live-query-1");
    db.kill(&live_id).await.unwrap();
    server.await.unwrap();
}

/// Scripted WebSocket server speaking the envelope protocol.
async fn scripted_ws_server(io: DuplexStream) {
    let mut ws = accept_async(io).await.unwrap();
    while let Some(msg) = ws.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(_) => break,
        };
        let frame: Value = serde_json::from_str(&text).unwrap();
        let id = frame["id"].clone();
        let reply = match frame["method"].as_str().unwrap() {
            "signin" => json!({"id": id, "result": "tok-abc"}),
            "use" => json!({"id": id, "result": null}),
            "create" => json!({"id": id, "result": {
                "id": "person:1", "name": frame["params"][1]["name"]
            }}),
            "select" => json!({"id": id, "result": [{"id": "person:1"}]}),
            "delete" => json!({"id": id, "result": []}),
            "ping" => json!({"id": id, "result": true}),
            _ => json!({"error": {"code": -32601, "message": "method not found"}}),
        };
        ws.send(Message::Text(reply.to_string())).await.unwrap();
    }
}

/// Full session over a real WebSocket handshake: auth, CRUD, double close.
#[tokio::test]
async fn test_websocket_end_to_end() {
    let (client_io, server_io) = tokio::io::duplex(8192);
    let server = tokio::spawn(scripted_ws_server(server_io));

    let (ws, _) = client_async("ws://localhost/rpc", client_io).await.unwrap();
    let mut db = Client::new("ws://localhost/rpc");
    db.connect_with(WsTransport::from_stream(ws)).unwrap();
    assert_eq!(db.state(), ConnectionState::Connected);

    let token = db.signin(json!({"user": "root", "pass": "root"})).await.unwrap();
    assert_eq!(token, "tok-abc");
    assert_eq!(db.token(), Some("tok-abc"));

    db.use_ns("test", "test").await.unwrap();

    let created = db.create("person", Some(json!({"name": "Tobie"}))).await.unwrap();
    assert_eq!(created["name"], "Tobie");

    let people = db.select("person").await.unwrap();
    assert_eq!(people.as_array().unwrap().len(), 1);

    assert!(db.ping().await.unwrap());

    let deleted = db.delete("person").await.unwrap();
    assert_eq!(deleted, json!([]));

    db.close().await;
    assert_eq!(db.state(), ConnectionState::Disconnected);
    db.close().await;
    assert_eq!(db.state(), ConnectionState::Disconnected);

    server.await.unwrap();
}

/// Unknown methods come back as an error envelope, classified by context.
#[tokio::test]
async fn test_unknown_method_over_websocket() {
    let (client_io, server_io) = tokio::io::duplex(8192);
    let server = tokio::spawn(scripted_ws_server(server_io));

    let (ws, _) = client_async("ws://localhost/rpc", client_io).await.unwrap();
    let mut db = Client::new("ws://localhost/rpc");
    db.connect_with(WsTransport::from_stream(ws)).unwrap();

    let err = db
        .call("frobnicate", Vec::new(), ErrorContext::Query)
        .await
        .unwrap_err();
    assert!(matches!(err, FathomError::Protocol { code: -32601, .. }));

    db.close().await;
    server.await.unwrap();
}
