// Juju RPC wire framing.
//
// Every call is a single JSON text frame over the websocket:
//
//   { "request-id": 1, "type": "Admin", "version": 3,
//     "request": "Login", "params": { ... } }
//
// and every reply echoes the request id with either a `response` body or
// an `error` / `error-code` pair. Request ids are positive and increase
// monotonically within a connection.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An outbound RPC frame.
#[derive(Debug, Serialize)]
pub(crate) struct RpcRequest<'a> {
    #[serde(rename = "request-id")]
    pub request_id: u64,
    /// Facade name, e.g. `"Admin"` or `"Application"`.
    #[serde(rename = "type")]
    pub facade: &'a str,
    pub version: u32,
    /// Method name on the facade, e.g. `"Login"` or `"Get"`.
    pub request: &'a str,
    pub params: Value,
}

/// An inbound RPC frame. Exactly one of `response` / `error` is
/// meaningful; Juju sends `error-code` alongside `error` for failures
/// that have a machine-readable classification.
#[derive(Debug, Deserialize)]
pub(crate) struct RpcResponse {
    #[serde(rename = "request-id")]
    pub request_id: u64,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(rename = "error-code", default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub response: Value,
}

// ── Tests ────────────────────────────────────────────────────────────
