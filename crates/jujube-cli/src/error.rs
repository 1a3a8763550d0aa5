//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable
//! help text.

use miette::Diagnostic;
use thiserror::Error;

use jujube_core::CoreError;

/// Exit codes, one per failure class.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const EXTERNAL_TOOL: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Credential loading ───────────────────────────────────────────

    #[error("The local juju CLI could not provide controller credentials")]
    #[diagnostic(
        code(jujube::external_tool),
        help(
            "jujube reads credentials from `juju show-controller --show-password`.\n\
             Check that juju is installed and a controller is registered: juju controllers\n\
             Detail: {message}"
        )
    )]
    ExternalTool { message: String },

    #[error("Could not parse the juju CLI output")]
    #[diagnostic(
        code(jujube::malformed_output),
        help(
            "`juju show-controller --format=json` returned something unexpected.\n\
             Detail: {message}"
        )
    )]
    MalformedOutput { message: String },

    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to the controller")]
    #[diagnostic(
        code(jujube::connection_failed),
        help(
            "Endpoints tried: {endpoints}\n\
             Check that the controller is reachable: juju status\n\
             Detail: {reason}"
        )
    )]
    ConnectionFailed { endpoints: String, reason: String },

    #[error("Authentication failed")]
    #[diagnostic(
        code(jujube::auth_failed),
        help(
            "The account reported by `juju show-controller` was rejected by the controller.\n\
             Detail: {message}"
        )
    )]
    AuthFailed { message: String },

    #[error("Connection timed out after {seconds}s")]
    #[diagnostic(
        code(jujube::timeout),
        help("Increase the dial timeout with --timeout or check controller responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Query ────────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(
        code(jujube::not_found),
        help("Check the application name and model: juju status")
    )]
    NotFound { message: String },

    #[error("Controller API error: {message}")]
    #[diagnostic(code(jujube::api_error))]
    Api { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(jujube::validation))]
    Validation { field: String, reason: String },

    #[error("No model selected")]
    #[diagnostic(
        code(jujube::no_model),
        help(
            "Pass --model <uuid>, set JUJUBE_MODEL, or set defaults.model in {path}"
        )
    )]
    NoModel { path: String },

    // ── IO / settings ────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(code(jujube::settings))]
    Settings(Box<figment::Error>),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Settings(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ExternalTool { .. } | Self::MalformedOutput { .. } => exit_code::EXTERNAL_TOOL,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NoModel { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ExternalTool { message } => CliError::ExternalTool { message },

            CoreError::MalformedOutput { message } => CliError::MalformedOutput { message },

            CoreError::NotConfigured => CliError::Api {
                message: "no controller configuration loaded".into(),
            },

            CoreError::ConnectionFailed { endpoints, reason } => CliError::ConnectionFailed {
                endpoints: if endpoints.is_empty() {
                    "(none)".into()
                } else {
                    endpoints.join(", ")
                },
                reason,
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::NotFound { message } => CliError::NotFound { message },

            CoreError::Unsupported { operation } => CliError::Api {
                message: format!("operation not supported by this controller: {operation}"),
            },

            CoreError::Api { message, code } => CliError::Api {
                message: match code {
                    Some(code) => format!("{message} ({code})"),
                    None => message,
                },
            },
        }
    }
}
