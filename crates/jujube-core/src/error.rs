// ── Core error types ──
//
// User-facing errors from jujube-core. Consumers never see websocket or
// rustls failures directly; the `From<jujube_api::Error>` impl
// translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Credential loading ───────────────────────────────────────────
    /// The local juju CLI could not be run, exited abnormally, or
    /// produced no output.
    #[error("Local juju CLI failed: {message}")]
    ExternalTool { message: String },

    /// The juju CLI output could not be parsed into the expected shape,
    /// at either the generic-JSON or the typed stage.
    #[error("Could not parse juju CLI output: {message}")]
    MalformedOutput { message: String },

    // ── Sequencing ───────────────────────────────────────────────────
    /// A connection was requested before any configuration was loaded.
    #[error("No controller configuration loaded")]
    NotConfigured,

    // ── Connection errors ────────────────────────────────────────────
    #[error("Controller connection failed: {reason}")]
    ConnectionFailed {
        endpoints: Vec<String>,
        reason: String,
    },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Controller connection timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Query errors ─────────────────────────────────────────────────
    #[error("{message}")]
    NotFound { message: String },

    #[error("Operation not supported by this controller: {operation}")]
    Unsupported { operation: String },

    /// RPC-level error from an established session.
    #[error("Controller API error: {message}")]
    Api {
        message: String,
        code: Option<String>,
    },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<jujube_api::Error> for CoreError {
    fn from(err: jujube_api::Error) -> Self {
        match err {
            jujube_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            jujube_api::Error::Timeout { timeout } => CoreError::Timeout {
                timeout_secs: timeout.as_secs(),
            },
            jujube_api::Error::Rpc { message, code } => {
                if code.as_deref() == Some("not found") {
                    CoreError::NotFound { message }
                } else {
                    CoreError::Api { message, code }
                }
            }
            jujube_api::Error::UnsupportedFacade { facade } => CoreError::Unsupported {
                operation: format!("{facade} facade calls"),
            },
            jujube_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("unexpected controller response: {message}"),
                code: None,
            },
            jujube_api::Error::NoEndpoints => CoreError::ConnectionFailed {
                endpoints: Vec::new(),
                reason: "controller configuration lists no API endpoints".into(),
            },
            other => CoreError::ConnectionFailed {
                endpoints: Vec::new(),
                reason: other.to_string(),
            },
        }
    }
}
