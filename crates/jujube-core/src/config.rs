// ── Runtime connection configuration ──
//
// Describes *how* to reach a controller. Carries credential data but
// never touches disk or subprocesses — the credential loader builds a
// `ControllerConfig` and hands it in.

use secrecy::SecretString;

/// Connection parameters for a single controller.
///
/// Produced by [`crate::credentials`] from the local juju CLI and held
/// by [`crate::Controller`]. The target model is deliberately *not*
/// part of this value; it is chosen per connection.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller CA certificate, PEM text.
    pub ca_cert: String,
    /// API endpoints as `host:port`, in the order the controller
    /// reported them.
    pub endpoints: Vec<String>,
    /// Account name (without the `user-` tag prefix).
    pub username: String,
    pub password: SecretString,
}
