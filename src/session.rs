use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::model::{AdminUser, TokenClaims, TokenPair};

/// Where a caller stands with the backend.
///
/// `Unauthenticated` is terminal until the next explicit login.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
    NeedsRefresh,
}

/// A token pair together with the admin it was issued to.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub user: AdminUser,
    tokens: TokenPair,
    access_expires_at: i64,
    refresh_expires_at: i64,
}

impl Session {
    pub fn establish(user: AdminUser, tokens: TokenPair) -> Result<Self, ApiError> {
        let access = TokenClaims::decode(&tokens.access_token)?;
        let refresh = TokenClaims::decode(&tokens.refresh_token)?;
        Ok(Self {
            user,
            tokens,
            access_expires_at: access.exp,
            refresh_expires_at: refresh.exp,
        })
    }

    pub fn tokens(&self) -> &TokenPair {
        &self.tokens
    }

    pub fn access_token(&self) -> &str {
        &self.tokens.access_token
    }

    pub fn refresh_token(&self) -> &str {
        &self.tokens.refresh_token
    }

    pub fn access_expires_at(&self) -> i64 {
        self.access_expires_at
    }

    pub fn refresh_expires_at(&self) -> i64 {
        self.refresh_expires_at
    }

    pub fn state_at(&self, now: i64, skew_secs: i64) -> SessionState {
        if self.access_expires_at <= now.saturating_add(skew_secs) {
            SessionState::NeedsRefresh
        } else {
            SessionState::Authenticated
        }
    }

    /// Whether a refresh can still succeed, as far as the client can tell.
    pub fn refresh_usable_at(&self, now: i64) -> bool {
        self.refresh_expires_at > now
    }

    /// Replace the access token, and the refresh token when the backend rotated it.
    pub fn apply_refresh(
        &mut self,
        access_token: String,
        refresh_token: Option<String>,
    ) -> Result<(), ApiError> {
        let access = TokenClaims::decode(&access_token)?;
        if let Some(refresh_token) = refresh_token {
            let refresh = TokenClaims::decode(&refresh_token)?;
            self.tokens.refresh_token = refresh_token;
            self.refresh_expires_at = refresh.exp;
        }
        self.tokens.access_token = access_token;
        self.access_expires_at = access.exp;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
