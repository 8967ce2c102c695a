use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::model::unix_now;
use crate::session::{Session, SessionState};

mod admin_users;
mod auth_session;
mod http_client;

pub use self::http_client::Probe;

/// Blocking client for the admin API that owns at most one [`Session`].
pub struct AdminClient {
    config: ClientConfig,
    session: Option<Session>,
    client: reqwest::blocking::Client,
}

impl AdminClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            config,
            session: None,
            client,
        })
    }

    /// Resume a session obtained earlier (for example from a session file).
    pub fn with_session(config: ClientConfig, session: Session) -> Result<Self, ApiError> {
        let mut out = Self::new(config)?;
        out.session = Some(session);
        Ok(out)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn state(&self) -> SessionState {
        match &self.session {
            None => SessionState::Unauthenticated,
            Some(s) => s.state_at(unix_now(), 0),
        }
    }

    /// Drop the current session. No request is sent; the backend keeps no session state.
    pub fn discard(&mut self) -> Option<Session> {
        self.session.take()
    }
}
