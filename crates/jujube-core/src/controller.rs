// ── Controller abstraction ──
//
// Holds controller configuration and produces authenticated connections
// from it. The holder walks Unconfigured → Configured explicitly:
// connecting before a successful credential load fails without any
// network I/O, and reloading simply replaces the held configuration.

use tracing::debug;

use jujube_api::{ApplicationGetResults, ConnectConfig, Connection, DialOptions};

use crate::config::ControllerConfig;
use crate::credentials::LocalJuju;
use crate::error::CoreError;

/// Configuration holder and connection factory.
#[derive(Debug, Default)]
pub struct Controller {
    config: Option<ControllerConfig>,
    dial: DialOptions,
}

impl Controller {
    /// An unconfigured holder with default dial options.
    pub fn new() -> Self {
        Self::default()
    }

    /// An unconfigured holder with explicit dial options.
    pub fn with_dial_options(dial: DialOptions) -> Self {
        Self { config: None, dial }
    }

    pub fn dial_options(&self) -> &DialOptions {
        &self.dial
    }

    /// The held configuration, if any.
    pub fn config(&self) -> Option<&ControllerConfig> {
        self.config.as_ref()
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    // ── Configuration ────────────────────────────────────────────────

    /// Hold `config`, replacing any previous configuration.
    pub fn configure(&mut self, config: ControllerConfig) {
        self.config = Some(config);
    }

    /// Load configuration from the `juju` binary on `PATH`.
    pub async fn configure_from_local_juju(&mut self) -> Result<(), CoreError> {
        self.configure_with(&LocalJuju::default()).await
    }

    /// Load configuration through `juju`.
    ///
    /// On failure the previously held configuration (if any) is left
    /// untouched.
    pub async fn configure_with(&mut self, juju: &LocalJuju) -> Result<(), CoreError> {
        let (name, document) = juju.show_controller().await?;
        debug!(controller = %name, "controller configured from local juju CLI");
        self.config = Some(document.connection_config());
        Ok(())
    }

    // ── Connection establishment ─────────────────────────────────────

    /// Open a controller-scoped connection (no target model).
    pub async fn connect(&self) -> Result<Connection, CoreError> {
        self.connect_model("").await
    }

    /// Open a connection scoped to `model_uuid` (empty means none).
    ///
    /// Requires a held configuration; fails with
    /// [`CoreError::NotConfigured`] before any network I/O otherwise.
    /// A failed establish leaves the holder configured and retriable.
    pub async fn connect_model(&self, model_uuid: &str) -> Result<Connection, CoreError> {
        let config = self.config.as_ref().ok_or(CoreError::NotConfigured)?;

        let connect = ConnectConfig {
            endpoints: config.endpoints.clone(),
            model_uuid: (!model_uuid.is_empty()).then(|| model_uuid.to_string()),
            username: config.username.clone(),
            password: config.password.clone(),
            ca_cert: config.ca_cert.clone(),
        };

        Connection::connect(&connect, &self.dial)
            .await
            .map_err(|e| match e {
                jujube_api::Error::Authentication { message } => {
                    CoreError::AuthenticationFailed { message }
                }
                jujube_api::Error::Timeout { timeout } => CoreError::Timeout {
                    timeout_secs: timeout.as_secs(),
                },
                other => CoreError::ConnectionFailed {
                    endpoints: config.endpoints.clone(),
                    reason: other.to_string(),
                },
            })
    }

    // ── Scoped queries ───────────────────────────────────────────────

    /// Fetch an application's charm configuration within a model.
    ///
    /// Scoped acquisition: the connection is opened for this one query
    /// and closed on every path — success, RPC error, or decode
    /// failure — so callers cannot leak the socket through an early
    /// return.
    pub async fn application_config(
        &self,
        model_uuid: &str,
        application: &str,
        branch: &str,
    ) -> Result<ApplicationGetResults, CoreError> {
        let mut conn = self.connect_model(model_uuid).await?;
        let result = conn.application_get(application, branch).await;

        if let Err(e) = conn.close().await {
            debug!(error = %e, "connection close failed");
        }

        result.map_err(CoreError::from)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
