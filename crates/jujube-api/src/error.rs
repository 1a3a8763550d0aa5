use std::time::Duration;

use thiserror::Error;

/// Juju error code attached to RPC failures caused by bad credentials.
pub(crate) const CODE_UNAUTHORIZED: &str = "unauthorized access";

/// Top-level error type for the `jujube-api` crate.
///
/// Covers every failure mode of a controller session: dialing, TLS,
/// the websocket upgrade, RPC-level errors and payload decoding.
/// `jujube-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Dialing ─────────────────────────────────────────────────────
    /// The connection configuration carried no API endpoints.
    #[error("No controller API endpoints to dial")]
    NoEndpoints,

    /// TCP-level failure (connection refused, unreachable, reset).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS configuration or handshake failure.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The websocket upgrade was rejected or failed.
    #[error("WebSocket handshake failed: {0}")]
    Handshake(String),

    /// The overall dial deadline elapsed before any endpoint answered.
    #[error("Connection attempt timed out after {}s", .timeout.as_secs())]
    Timeout { timeout: Duration },

    // ── Established session ─────────────────────────────────────────
    /// Websocket transport error on an established connection.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The server closed the connection mid-conversation.
    #[error("Connection closed by the controller")]
    ConnectionClosed,

    // ── RPC ─────────────────────────────────────────────────────────
    /// Login was rejected (bad username/password or revoked account).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Structured error returned by the controller for an RPC call.
    #[error("Controller RPC error: {message}")]
    Rpc {
        message: String,
        /// Juju error code, e.g. `"not found"` or `"unauthorized access"`.
        code: Option<String>,
    },

    /// The server does not advertise the facade a call needs.
    #[error("Controller does not support the {facade} facade")]
    UnsupportedFacade { facade: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Build the appropriate error for an RPC failure frame, promoting
    /// credential rejections to [`Error::Authentication`].
    pub(crate) fn from_rpc(message: String, code: Option<String>) -> Self {
        if code.as_deref() == Some(CODE_UNAUTHORIZED) {
            Self::Authentication { message }
        } else {
            Self::Rpc { message, code }
        }
    }

    /// Returns `true` if this is a transient error worth re-dialing.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::Timeout { .. } | Self::ConnectionClosed | Self::Handshake(_)
        )
    }

    /// Returns `true` if this is a "not found" error from the controller.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Rpc { code: Some(code), .. } if code == "not found")
    }
}
