// Application facade: charm configuration reads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::connection::Connection;
use crate::error::Error;

const APPLICATION_FACADE: &str = "Application";

/// Highest Application facade version this client speaks. The
/// negotiated version is the server's maximum clamped to this.
const MAX_SUPPORTED_VERSION: u32 = 20;

#[derive(Debug, Serialize)]
struct GetArgs<'a> {
    application: &'a str,
    /// Branch (generation) to read from; empty means the current one.
    branch: &'a str,
}

/// Result of `Application.Get`: the application's charm configuration
/// as reported by the controller.
///
/// `config` maps each charm option name to its descriptor
/// (`{type, description, value, source, default}`); values are kept as
/// raw JSON since option types vary per charm.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ApplicationGetResults {
    pub application: String,
    pub charm: String,
    pub config: Map<String, Value>,
    pub application_config: Map<String, Value>,
    pub constraints: Value,
    pub series: String,
    pub channel: String,
    pub endpoint_bindings: BTreeMap<String, String>,
}

impl Connection {
    /// Fetch `application`'s charm configuration.
    ///
    /// Fails with [`Error::UnsupportedFacade`] if the server never
    /// advertised the Application facade (login missing or a very old
    /// controller), and with a `"not found"` RPC error if the
    /// application does not exist in the scoped model.
    pub async fn application_get(
        &mut self,
        application: &str,
        branch: &str,
    ) -> Result<ApplicationGetResults, Error> {
        let version = self
            .facade_version(APPLICATION_FACADE)
            .ok_or_else(|| Error::UnsupportedFacade {
                facade: APPLICATION_FACADE.into(),
            })?
            .min(MAX_SUPPORTED_VERSION);

        let args = GetArgs {
            application,
            branch,
        };
        let params = serde_json::to_value(&args).expect("get args serialize");

        debug!(application, version, "fetching application configuration");
        let response = self
            .call(APPLICATION_FACADE, version, "Get", params)
            .await?;

        serde_json::from_value(response.clone()).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: response.to_string(),
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────
