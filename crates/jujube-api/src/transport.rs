// Dial tuning and TLS configuration for controller connections.
//
// Juju controllers serve their API over TLS with a certificate issued by
// the controller's own CA; the CA certificate travels with the credentials
// (`show-controller` output). Certificates are issued to a fixed server
// name rather than the dialed address, so verification pins that name.

use std::sync::Arc;
use std::time::Duration;

use rustls_pki_types::pem::PemObject;
use rustls_pki_types::CertificateDer;

use crate::error::Error;

/// Server name Juju controller certificates are issued to.
pub(crate) const JUJU_TLS_SERVER_NAME: &str = "juju-apiserver";

/// Knobs governing a single dial attempt.
///
/// Both fields are named (not buried in the dial loop) so callers and
/// tests can tighten them without touching global state.
#[derive(Debug, Clone)]
pub struct DialOptions {
    /// Overall deadline for the whole dial, across every endpoint sweep.
    /// Default: 5 minutes.
    pub timeout: Duration,

    /// Delay between endpoint sweeps. Default: 1 second — a reachable
    /// controller answers quickly, so the sweep stays tight within the
    /// larger overall deadline.
    pub retry_delay: Duration,
}

impl Default for DialOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5 * 60),
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Resolved TLS material for dialing: a rustls client config plus the
/// server name to verify against (`None` means "use the dialed host").
#[derive(Debug)]
pub(crate) struct TlsSettings {
    pub config: Arc<rustls::ClientConfig>,
    pub server_name: Option<&'static str>,
}

/// Build TLS settings from the controller CA certificate.
///
/// A non-empty `ca_cert` is treated as PEM text and becomes the only
/// trusted root, verified against the fixed Juju server name. An empty
/// `ca_cert` falls back to the webpki root store and ordinary host-name
/// verification (controllers fronted by a real certificate).
pub(crate) fn tls_settings(ca_cert: &str) -> Result<TlsSettings, Error> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let builder = rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| Error::Tls(e.to_string()))?;

    let mut roots = rustls::RootCertStore::empty();

    if ca_cert.trim().is_empty() {
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let config = builder.with_root_certificates(roots).with_no_client_auth();
        return Ok(TlsSettings {
            config: Arc::new(config),
            server_name: None,
        });
    }

    for cert in CertificateDer::pem_slice_iter(ca_cert.as_bytes()) {
        let cert = cert.map_err(|e| Error::Tls(format!("invalid CA certificate: {e}")))?;
        roots
            .add(cert)
            .map_err(|e| Error::Tls(format!("rejected CA certificate: {e}")))?;
    }

    if roots.is_empty() {
        return Err(Error::Tls(
            "controller CA certificate contains no certificates".into(),
        ));
    }

    let config = builder.with_root_certificates(roots).with_no_client_auth();
    Ok(TlsSettings {
        config: Arc::new(config),
        server_name: Some(JUJU_TLS_SERVER_NAME),
    })
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn dial_defaults_match_documented_constants() {
        let options = DialOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(300));
        assert_eq!(options.retry_delay, Duration::from_secs(1));
    }

    #[test]
    fn empty_ca_cert_uses_system_roots_and_host_verification() {
        let settings = tls_settings("").unwrap();
        assert!(settings.server_name.is_none());
    }

    #[test]
    fn whitespace_ca_cert_is_treated_as_absent() {
        let settings = tls_settings("  \n").unwrap();
        assert!(settings.server_name.is_none());
    }

    #[test]
    fn garbage_ca_cert_is_rejected() {
        let err = tls_settings("not a pem at all").unwrap_err();
        assert!(matches!(err, Error::Tls(_)), "expected Tls error, got: {err:?}");
    }

    #[test]
    fn truncated_pem_is_rejected() {
        let err = tls_settings("-----BEGIN CERTIFICATE-----\nAAAA\n").unwrap_err();
        assert!(matches!(err, Error::Tls(_)), "expected Tls error, got: {err:?}");
    }
}
