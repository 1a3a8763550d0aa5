// Integration tests for `Connection` against an in-process websocket
// server speaking the Juju RPC framing.
#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use secrecy::SecretString;
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;

use jujube_api::{Connection, Error};

// ── Mock controller ─────────────────────────────────────────────────

/// Scripted behavior for one mock controller session.
#[derive(Clone)]
struct Script {
    /// Reply body for `Admin.Login` (merged with the request id).
    login: Value,
    /// Reply body for `Application.Get`.
    get: Value,
    /// Send a frame with an unrelated request id before each real reply.
    stale_frame_first: bool,
}

impl Script {
    fn ok() -> Self {
        Self {
            login: json!({
                "response": {
                    "controller-tag": "controller-deadbeef",
                    "server-version": "3.1.8",
                    "facades": [
                        { "name": "Admin", "versions": [3] },
                        { "name": "Application", "versions": [19, 20] },
                    ],
                },
            }),
            get: json!({
                "response": {
                    "application": "tiny-bash",
                    "charm": "tiny-bash-3",
                    "config": {
                        "poll-interval": { "type": "int", "value": 30, "source": "user" },
                    },
                },
            }),
            stale_frame_first: false,
        }
    }
}

fn reply_frame(request_id: u64, mut body: Value) -> Message {
    body["request-id"] = request_id.into();
    Message::text(body.to_string())
}

/// Accept one websocket session and answer RPC frames per the script.
///
/// Login frames are validated: anything other than `user-admin` /
/// `secret` gets an unauthorized reply regardless of the script.
async fn spawn_controller(script: Script) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

        while let Some(Ok(message)) = ws.next().await {
            let Message::Text(text) = message else {
                continue;
            };
            let frame: Value = serde_json::from_str(text.as_str()).unwrap();
            let request_id = frame["request-id"].as_u64().unwrap();

            if script.stale_frame_first {
                ws.send(reply_frame(9999, json!({ "response": {} })))
                    .await
                    .unwrap();
            }

            let body = match (frame["type"].as_str(), frame["request"].as_str()) {
                (Some("Admin"), Some("Login")) => {
                    let params = &frame["params"];
                    if params["auth-tag"] == "user-admin" && params["credentials"] == "secret" {
                        script.login.clone()
                    } else {
                        json!({
                            "error": "invalid entity name or password",
                            "error-code": "unauthorized access",
                        })
                    }
                }
                (Some("Application"), Some("Get")) => {
                    // The client must clamp to a version it supports.
                    if frame["version"].as_u64().unwrap() > 20 {
                        json!({ "error": "unknown version", "error-code": "not supported" })
                    } else {
                        script.get.clone()
                    }
                }
                _ => json!({ "error": "unknown facade request" }),
            };

            ws.send(reply_frame(request_id, body)).await.unwrap();
        }
    });

    addr
}

async fn connect_to(addr: SocketAddr) -> Connection {
    let stream = TcpStream::connect(addr).await.unwrap();
    Connection::handshake(&format!("ws://{addr}/api"), stream)
        .await
        .unwrap()
}

fn secret(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

// ── Happy path ──────────────────────────────────────────────────────

#[tokio::test]
async fn login_and_application_get_round_trip() {
    let addr = spawn_controller(Script::ok()).await;
    let mut conn = connect_to(addr).await;

    let login = conn.login("admin", &secret("secret")).await.unwrap();
    assert_eq!(login.server_version, "3.1.8");
    assert_eq!(conn.server_version(), Some("3.1.8"));
    assert_eq!(conn.facade_version("Application"), Some(20));

    let results = conn.application_get("tiny-bash", "").await.unwrap();
    assert_eq!(results.application, "tiny-bash");
    assert_eq!(results.charm, "tiny-bash-3");
    assert_eq!(results.config["poll-interval"]["value"], 30);

    conn.close().await.unwrap();
}

#[tokio::test]
async fn skips_frames_for_other_request_ids() {
    let mut script = Script::ok();
    script.stale_frame_first = true;
    let addr = spawn_controller(script).await;
    let mut conn = connect_to(addr).await;

    conn.login("admin", &secret("secret")).await.unwrap();
    let results = conn.application_get("tiny-bash", "").await.unwrap();
    assert_eq!(results.application, "tiny-bash");

    conn.close().await.unwrap();
}

// ── Error paths ─────────────────────────────────────────────────────

#[tokio::test]
async fn rejected_credentials_map_to_authentication() {
    let addr = spawn_controller(Script::ok()).await;
    let mut conn = connect_to(addr).await;

    let err = conn.login("admin", &secret("wrong")).await.unwrap_err();
    assert!(
        matches!(err, Error::Authentication { .. }),
        "expected Authentication, got: {err:?}"
    );

    conn.close().await.unwrap();
}

#[tokio::test]
async fn missing_application_facade_is_unsupported() {
    let mut script = Script::ok();
    script.login = json!({
        "response": {
            "server-version": "2.0.0",
            "facades": [{ "name": "Admin", "versions": [3] }],
        },
    });
    let addr = spawn_controller(script).await;
    let mut conn = connect_to(addr).await;

    conn.login("admin", &secret("secret")).await.unwrap();
    let err = conn.application_get("tiny-bash", "").await.unwrap_err();
    assert!(
        matches!(err, Error::UnsupportedFacade { .. }),
        "expected UnsupportedFacade, got: {err:?}"
    );

    conn.close().await.unwrap();
}

#[tokio::test]
async fn unknown_application_is_not_found() {
    let mut script = Script::ok();
    script.get = json!({
        "error": "application \"nope\" not found",
        "error-code": "not found",
    });
    let addr = spawn_controller(script).await;
    let mut conn = connect_to(addr).await;

    conn.login("admin", &secret("secret")).await.unwrap();
    let err = conn.application_get("nope", "").await.unwrap_err();

    assert!(err.is_not_found(), "expected not-found, got: {err:?}");
    match err {
        Error::Rpc { message, code } => {
            assert_eq!(code.as_deref(), Some("not found"));
            assert!(message.contains("nope"));
        }
        other => panic!("expected Rpc error, got: {other:?}"),
    }

    conn.close().await.unwrap();
}
