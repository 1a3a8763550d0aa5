// Credential discovery through the locally installed juju CLI.
//
// `juju show-controller --show-password --format=json` prints a mapping
// from controller name to a fixed-shape record. The controller name is
// unpredictable, so decoding happens in two stages: first into a generic
// sorted map to discover the key, then the first entry's value directly
// into the typed document. Sorted iteration keeps entry selection
// deterministic when several controllers are registered.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::ControllerConfig;
use crate::error::CoreError;

/// Fixed arguments for the credential query. Only the binary itself is
/// configurable (tests and settings point it at a stub).
const SHOW_CONTROLLER_ARGS: [&str; 3] = ["show-controller", "--show-password", "--format=json"];

// ── Document shape ───────────────────────────────────────────────────

/// One controller entry from `show-controller` output.
///
/// Every field tolerates absence — the CLI output varies across juju
/// versions and the connection path only needs a handful of them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ControllerDocument {
    pub details: ControllerDetails,
    pub current_model: String,
    pub models: BTreeMap<String, ModelSummary>,
    pub account: Account,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ControllerDetails {
    pub uuid: String,
    pub api_endpoints: Vec<String>,
    pub cloud: String,
    pub region: String,
    pub agent_version: String,
    pub agent_git_commit: String,
    pub controller_model_version: String,
    pub mongo_version: String,
    pub ca_fingerprint: String,
    pub ca_cert: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ModelSummary {
    pub uuid: String,
    pub unit_count: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Account {
    pub user: String,
    pub password: String,
    pub access: String,
}

impl ControllerDocument {
    /// Project the document into connection parameters.
    ///
    /// Copies are byte-for-byte; the target model is left to the
    /// connection step.
    pub fn connection_config(&self) -> ControllerConfig {
        ControllerConfig {
            ca_cert: self.details.ca_cert.clone(),
            endpoints: self.details.api_endpoints.clone(),
            username: self.account.user.clone(),
            password: SecretString::from(self.account.password.clone()),
        }
    }
}

// ── Runner ───────────────────────────────────────────────────────────

/// Handle on the locally installed juju CLI.
#[derive(Debug, Clone)]
pub struct LocalJuju {
    command: PathBuf,
}

impl Default for LocalJuju {
    fn default() -> Self {
        Self::new("juju")
    }
}

impl LocalJuju {
    /// Use `command` instead of the `juju` found on `PATH`.
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &Path {
        &self.command
    }

    /// Run `show-controller` and decode its output.
    ///
    /// Returns the controller name alongside the document. Fails with
    /// [`CoreError::ExternalTool`] when the binary is missing, exits
    /// nonzero, or prints nothing; with [`CoreError::MalformedOutput`]
    /// when the output cannot be decoded.
    pub async fn show_controller(&self) -> Result<(String, ControllerDocument), CoreError> {
        let output = Command::new(&self.command)
            .args(SHOW_CONTROLLER_ARGS)
            .output()
            .await
            .map_err(|e| CoreError::ExternalTool {
                message: format!("failed to run {}: {e}", self.command.display()),
            })?;

        if !output.status.success() {
            return Err(CoreError::ExternalTool {
                message: format!(
                    "{} {} exited with {}",
                    self.command.display(),
                    SHOW_CONTROLLER_ARGS.join(" "),
                    output.status
                ),
            });
        }

        if output.stdout.is_empty() {
            return Err(CoreError::ExternalTool {
                message: format!("{} produced no output", self.command.display()),
            });
        }

        let (name, document) = parse_show_controller(&output.stdout)?;
        debug!(
            controller = %name,
            endpoints = document.details.api_endpoints.len(),
            "controller credentials loaded from local juju CLI"
        );
        Ok((name, document))
    }
}

// ── Decoding ─────────────────────────────────────────────────────────

/// Decode `show-controller --format=json` bytes.
///
/// Stage one parses a generic controller-name → value mapping; stage
/// two decodes the first entry (in sorted key order) into the typed
/// document. A document listing several controllers is legal; only the
/// first sorted entry is used, with a warning.
pub fn parse_show_controller(bytes: &[u8]) -> Result<(String, ControllerDocument), CoreError> {
    let controllers: BTreeMap<String, serde_json::Value> =
        serde_json::from_slice(bytes).map_err(|e| CoreError::MalformedOutput {
            message: format!("expected a controller-name mapping: {e}"),
        })?;

    let total = controllers.len();
    let (name, entry) =
        controllers
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::MalformedOutput {
                message: "juju reported no controllers".into(),
            })?;

    if total > 1 {
        warn!(
            controller = %name,
            reported = total,
            "juju reported multiple controllers; using the first in sorted order"
        );
    }

    let document: ControllerDocument =
        serde_json::from_value(entry).map_err(|e| CoreError::MalformedOutput {
            message: format!("controller {name:?}: {e}"),
        })?;

    Ok((name, document))
}

// ── Tests ────────────────────────────────────────────────────────────
