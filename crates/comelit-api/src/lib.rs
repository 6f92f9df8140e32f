// comelit-api: Async Rust client for the Comelit SimpleHome HTTP endpoints
// (Serial Bridge + VEDO alarm panel).

pub mod auth;
pub mod error;
pub mod session;
pub mod transport;

pub use auth::HostKind;
pub use error::Error;
pub use session::models;
pub use session::{Session, VedoRoute};
pub use transport::TransportConfig;
