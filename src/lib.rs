//! Admin session client for the personal-training backend.
//!
//! [`client::AdminClient`] logs in, keeps the access token fresh and retries a
//! protected call once when its token expires mid-flight. [`harness`] and
//! [`verify`] build acceptance checks of the backend's auth contract on top of it.

pub mod client;
pub mod config;
pub mod error;
pub mod harness;
pub mod logging;
pub mod model;
pub mod session;
pub mod verify;

pub use self::client::AdminClient;
pub use self::config::ClientConfig;
pub use self::error::ApiError;
pub use self::model::{AdminUser, Credentials, TokenClaims, TokenPair};
pub use self::session::{Session, SessionState};
