// Admin facade: session authentication.
//
// `Login` is the first call on every connection. Its result carries the
// facade versions the server supports, which later calls use for
// version negotiation.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::connection::Connection;
use crate::error::Error;

const ADMIN_FACADE: &str = "Admin";
const ADMIN_FACADE_VERSION: u32 = 3;

/// Client version reported at login. Controllers use it for
/// compatibility checks only; it does not gate any call this crate makes.
const CLIENT_VERSION: &str = "3.1.8";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    /// Entity tag of the account, e.g. `user-admin`.
    #[serde(rename = "auth-tag")]
    auth_tag: String,
    credentials: &'a str,
    nonce: &'a str,
    #[serde(rename = "client-version")]
    client_version: &'a str,
}

/// Facade name plus the versions the server can speak.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FacadeVersions {
    pub name: String,
    pub versions: Vec<u32>,
}

/// Subset of the `Login` result this client consumes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LoginResult {
    pub controller_tag: String,
    pub model_tag: String,
    pub server_version: String,
    pub facades: Vec<FacadeVersions>,
}

impl Connection {
    /// Authenticate the session as `username`.
    ///
    /// On success the server-advertised facade versions are recorded on
    /// the connection for later negotiation. Credential rejections map
    /// to [`Error::Authentication`].
    pub async fn login(
        &mut self,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginResult, Error> {
        let request = LoginRequest {
            auth_tag: format!("user-{username}"),
            credentials: password.expose_secret(),
            nonce: "",
            client_version: CLIENT_VERSION,
        };
        let params = serde_json::to_value(&request).expect("login params serialize");

        let response = self
            .call(ADMIN_FACADE, ADMIN_FACADE_VERSION, "Login", params)
            .await?;

        let result: LoginResult =
            serde_json::from_value(response.clone()).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: response.to_string(),
            })?;

        self.register_login(&result);
        debug!(
            controller = %result.controller_tag,
            server_version = %result.server_version,
            facades = result.facades.len(),
            "login complete"
        );

        Ok(result)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
