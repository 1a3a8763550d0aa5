// Controller connection: dial loop, websocket upgrade, RPC plumbing.
//
// A `Connection` is a single authenticated websocket session, optionally
// scoped to one model via the `/model/{uuid}/api` path. Facade call
// methods live in `facades/*` as inherent impls; this module owns the
// transport mechanics only.

use std::collections::HashMap;

use futures_util::{SinkExt, StreamExt};
use secrecy::SecretString;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::WebSocketStream;
use tracing::{debug, info};

use crate::error::Error;
use crate::rpc::{RpcRequest, RpcResponse};
use crate::transport::{tls_settings, DialOptions, TlsSettings};

/// Byte stream a connection can run over. Blanket-implemented; exists so
/// the production TLS stream and in-process test streams share one type.
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> Transport for T {}

/// Everything needed to establish one controller connection.
///
/// Built by the caller from held controller configuration; the model
/// UUID is per-connection, not part of the stored credentials.
#[derive(Debug, Clone)]
pub struct ConnectConfig {
    /// Controller API endpoints as `host:port`, tried in order.
    pub endpoints: Vec<String>,
    /// Model to scope the session to; `None` dials the controller root.
    pub model_uuid: Option<String>,
    /// Account name (without the `user-` tag prefix).
    pub username: String,
    pub password: SecretString,
    /// Controller CA certificate, PEM text. Empty falls back to the
    /// system root store.
    pub ca_cert: String,
}

/// A live, authenticated controller session.
///
/// Exclusively owned; callers must [`close`](Self::close) it on every
/// exit path to release the underlying socket.
pub struct Connection {
    ws: WebSocketStream<Box<dyn Transport>>,
    next_request_id: u64,
    facades: HashMap<String, Vec<u32>>,
    server_version: Option<String>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("next_request_id", &self.next_request_id)
            .field("facades", &self.facades)
            .field("server_version", &self.server_version)
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Dial a controller and authenticate.
    ///
    /// Endpoints are swept in order; between full sweeps the dial sleeps
    /// for [`DialOptions::retry_delay`], and the whole dial is bounded by
    /// [`DialOptions::timeout`]. The first endpoint that completes
    /// TCP + TLS + websocket upgrade wins, after which a `Login` RPC
    /// authenticates the session. A failed login closes the socket
    /// before the error is returned.
    pub async fn connect(config: &ConnectConfig, options: &DialOptions) -> Result<Self, Error> {
        if config.endpoints.is_empty() {
            return Err(Error::NoEndpoints);
        }

        let tls = tls_settings(&config.ca_cert)?;
        let path = api_path(config.model_uuid.as_deref());

        let sweep = async {
            'sweep: loop {
                for endpoint in &config.endpoints {
                    debug!(endpoint = %endpoint, path = %path, "dialing controller endpoint");
                    match Self::dial_endpoint(endpoint, &path, &tls).await {
                        Ok(conn) => break 'sweep conn,
                        Err(e) => {
                            debug!(endpoint = %endpoint, error = %e, "endpoint dial failed");
                        }
                    }
                }
                tokio::time::sleep(options.retry_delay).await;
            }
        };

        let mut conn = match tokio::time::timeout(options.timeout, sweep).await {
            Ok(conn) => conn,
            Err(_) => {
                return Err(Error::Timeout {
                    timeout: options.timeout,
                })
            }
        };

        match conn.login(&config.username, &config.password).await {
            Ok(result) => {
                info!(
                    server_version = %result.server_version,
                    model_scoped = config.model_uuid.is_some(),
                    "connected to controller"
                );
                Ok(conn)
            }
            Err(e) => {
                let _ = conn.close().await;
                Err(e)
            }
        }
    }

    /// One dial attempt against a single endpoint: TCP, TLS, upgrade.
    async fn dial_endpoint(endpoint: &str, path: &str, tls: &TlsSettings) -> Result<Self, Error> {
        let tcp = TcpStream::connect(endpoint).await?;

        let name: &str = match tls.server_name {
            Some(pinned) => pinned,
            None => endpoint_host(endpoint),
        };
        let server_name = rustls_pki_types::ServerName::try_from(name.to_string())
            .map_err(|e| Error::Tls(format!("invalid server name {name}: {e}")))?;

        let connector = TlsConnector::from(tls.config.clone());
        let stream = connector
            .connect(server_name, tcp)
            .await
            .map_err(|e| Error::Tls(e.to_string()))?;

        let url = format!("wss://{endpoint}{path}");
        Self::handshake(&url, stream).await
    }

    /// Perform the websocket upgrade over an already-established stream.
    ///
    /// The production dial path uses this after TLS; tests hand in plain
    /// TCP streams against an in-process server.
    pub async fn handshake<S>(url: &str, stream: S) -> Result<Self, Error>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let boxed: Box<dyn Transport> = Box::new(stream);
        let (ws, _response) = tokio_tungstenite::client_async(url, boxed)
            .await
            .map_err(|e| Error::Handshake(e.to_string()))?;

        Ok(Self {
            ws,
            next_request_id: 0,
            facades: HashMap::new(),
            server_version: None,
        })
    }

    /// Issue one RPC call and wait for its reply.
    ///
    /// Replies are matched by request id; frames for other ids (server
    /// notifications, stale replies) are skipped.
    pub async fn call(
        &mut self,
        facade: &str,
        version: u32,
        request: &str,
        params: Value,
    ) -> Result<Value, Error> {
        self.next_request_id += 1;
        let request_id = self.next_request_id;

        let frame = RpcRequest {
            request_id,
            facade,
            version,
            request,
            params,
        };
        let text = serde_json::to_string(&frame).expect("rpc frame serializes");

        debug!(request_id, facade, request, "rpc call");
        self.ws.send(Message::text(text)).await?;

        loop {
            let Some(message) = self.ws.next().await else {
                return Err(Error::ConnectionClosed);
            };

            match message? {
                Message::Text(text) => {
                    let reply: RpcResponse =
                        serde_json::from_str(text.as_str()).map_err(|e| Error::Deserialization {
                            message: e.to_string(),
                            body: text.to_string(),
                        })?;

                    if reply.request_id != request_id {
                        debug!(
                            got = reply.request_id,
                            want = request_id,
                            "skipping frame for another request id"
                        );
                        continue;
                    }

                    if let Some(message) = reply.error {
                        return Err(Error::from_rpc(message, reply.error_code));
                    }

                    return Ok(reply.response);
                }
                Message::Close(_) => return Err(Error::ConnectionClosed),
                // Ping/pong are answered by tungstenite; binary is not
                // part of the Juju RPC protocol.
                _ => {}
            }
        }
    }

    /// The highest version of `facade` the server advertised at login.
    pub fn facade_version(&self, facade: &str) -> Option<u32> {
        self.facades.get(facade).and_then(|v| v.iter().copied().max())
    }

    /// Server version string from the login result, if reported.
    pub fn server_version(&self) -> Option<&str> {
        self.server_version.as_deref()
    }

    pub(crate) fn register_login(&mut self, result: &crate::facades::admin::LoginResult) {
        self.facades = result
            .facades
            .iter()
            .map(|f| (f.name.clone(), f.versions.clone()))
            .collect();
        if !result.server_version.is_empty() {
            self.server_version = Some(result.server_version.clone());
        }
    }

    /// Close the session, releasing the underlying socket.
    pub async fn close(mut self) -> Result<(), Error> {
        match self.ws.close(None).await {
            Ok(())
            | Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// API path for a connection: controller root, or scoped to one model.
fn api_path(model_uuid: Option<&str>) -> String {
    match model_uuid {
        Some(uuid) if !uuid.is_empty() => format!("/model/{uuid}/api"),
        _ => "/api".to_string(),
    }
}

/// Host portion of a `host:port` endpoint, with IPv6 brackets stripped.
fn endpoint_host(endpoint: &str) -> &str {
    let host = endpoint
        .rsplit_once(':')
        .map_or(endpoint, |(host, _port)| host);
    host.trim_start_matches('[').trim_end_matches(']')
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn api_path_scopes_to_model() {
        assert_eq!(api_path(None), "/api");
        assert_eq!(api_path(Some("")), "/api");
        assert_eq!(
            api_path(Some("f72ef260-3f4d-4f29-8e2a-32fc2bbfea60")),
            "/model/f72ef260-3f4d-4f29-8e2a-32fc2bbfea60/api"
        );
    }

    #[test]
    fn endpoint_host_strips_port_and_brackets() {
        assert_eq!(endpoint_host("10.0.0.1:17070"), "10.0.0.1");
        assert_eq!(endpoint_host("controller.internal:17070"), "controller.internal");
        assert_eq!(endpoint_host("[::1]:17070"), "::1");
        assert_eq!(endpoint_host("bare-host"), "bare-host");
    }

    #[tokio::test]
    async fn connect_with_no_endpoints_fails_without_io() {
        let config = ConnectConfig {
            endpoints: Vec::new(),
            model_uuid: None,
            username: "admin".into(),
            password: SecretString::from("secret".to_string()),
            ca_cert: String::new(),
        };

        let started = std::time::Instant::now();
        let err = Connection::connect(&config, &DialOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NoEndpoints), "got: {err:?}");
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }
}
