// jujube-api: Async Rust client for the Juju controller websocket RPC API

pub mod connection;
pub mod error;
pub mod facades;
pub(crate) mod rpc;
pub mod transport;

pub use connection::{ConnectConfig, Connection};
pub use error::Error;
pub use facades::admin::{FacadeVersions, LoginResult};
pub use facades::application::ApplicationGetResults;
pub use transport::DialOptions;
