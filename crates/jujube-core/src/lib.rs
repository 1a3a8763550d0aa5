// jujube-core: credential discovery and connection lifecycle between
// jujube-api and consumers (CLI).

pub mod config;
pub mod controller;
pub mod credentials;
pub mod error;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::ControllerConfig;
pub use controller::Controller;
pub use credentials::{Account, ControllerDetails, ControllerDocument, LocalJuju, ModelSummary};
pub use error::CoreError;

// Re-export the connection types consumers interact with directly.
pub use jujube_api::{ApplicationGetResults, Connection, DialOptions};
