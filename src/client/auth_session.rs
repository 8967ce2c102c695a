use reqwest::StatusCode;
use tracing::{debug, info, warn};

use super::http_client::read_body;
use super::*;
use crate::error::body_message;
use crate::model::{Credentials, LoginResponse, RefreshRequest, RefreshResponse, TokenPair};

impl AdminClient {
    /// Exchange credentials for a token pair and make it the current session.
    ///
    /// Wrong password and unknown email are both `AuthenticationFailed`.
    pub fn login(&mut self, credentials: &Credentials) -> Result<&Session, ApiError> {
        let resp = self
            .client
            .post(self.url("/api/admin/login"))
            .json(credentials)
            .send()?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            let status = resp.status();
            let body = read_body(resp);
            warn!(email = %credentials.email, "login rejected");
            return Err(ApiError::AuthenticationFailed(body_message(&body, status)));
        }

        let resp = self.ensure_ok(resp)?;
        let out: LoginResponse = Self::parse(resp, "login")?;
        let session = Session::establish(
            out.user,
            TokenPair {
                access_token: out.access_token,
                refresh_token: out.refresh_token,
            },
        )?;
        info!(email = %credentials.email, "logged in");
        Ok(&*self.session.insert(session))
    }

    /// Trade the refresh token for a new access token.
    ///
    /// A rejected refresh token ends the session; the caller has to log in again.
    pub fn refresh(&mut self) -> Result<(), ApiError> {
        let refresh_token = self
            .session
            .as_ref()
            .ok_or(ApiError::NoSession)?
            .refresh_token()
            .to_string();

        let resp = self
            .client
            .post(self.url("/api/admin/refresh"))
            .json(&RefreshRequest {
                refresh_token: &refresh_token,
            })
            .send()?;

        let resp = match self.ensure_ok(resp) {
            Ok(resp) => resp,
            Err(err @ (ApiError::Forbidden(_) | ApiError::Unauthenticated(_))) => {
                warn!("refresh token rejected; session discarded");
                self.session = None;
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        let out: RefreshResponse = Self::parse(resp, "refresh")?;
        let rotated = out.refresh_token.is_some();
        let session = self.session.as_mut().ok_or(ApiError::NoSession)?;
        session.apply_refresh(out.access_token, out.refresh_token)?;
        debug!(rotated, "access token refreshed");
        Ok(())
    }

    /// Refresh now if the access token expires within the configured skew.
    pub fn ensure_fresh(&mut self) -> Result<(), ApiError> {
        let session = self.session.as_ref().ok_or(ApiError::NoSession)?;
        if session.state_at(unix_now(), self.config.expiry_skew_secs) == SessionState::NeedsRefresh
        {
            self.refresh()?;
        }
        Ok(())
    }
}
