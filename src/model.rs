//! Wire types for the admin API and the JWT claims the client relies on.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Claims read from a token without checking its signature; the backend owns
/// verification. Only `exp` is required.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub exp: i64,

    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub typ: Option<String>,
    #[serde(default)]
    pub iat: Option<i64>,
}

impl TokenClaims {
    pub fn decode(token: &str) -> Result<Self, ApiError> {
        let mut validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        jsonwebtoken::decode::<TokenClaims>(
            token,
            &jsonwebtoken::DecodingKey::from_secret(&[]),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| ApiError::MalformedToken(e.to_string()))
    }

    /// True when the token is expired at `now`, or will be within `skew_secs`.
    pub fn expires_within(&self, now: i64, skew_secs: i64) -> bool {
        self.exp <= now.saturating_add(skew_secs)
    }
}

pub fn unix_now() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    pub email: String,

    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<String>,
    #[serde(default, alias = "created_by")]
    pub created_by: Option<String>,
    #[serde(default, alias = "last_login")]
    pub last_login: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshRequest<'a> {
    pub(crate) refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginResponse {
    pub(crate) access_token: String,
    pub(crate) refresh_token: String,
    pub(crate) user: AdminUser,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshResponse {
    pub(crate) access_token: String,

    // Present only when the backend rotates refresh tokens.
    #[serde(default)]
    pub(crate) refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsersResponse {
    pub(crate) users: Vec<AdminUser>,
}

#[derive(Clone, Debug, Serialize)]
pub struct NewAdmin {
    pub email: String,
    pub password: String,
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateUserResponse {
    pub(crate) user: AdminUser,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangePasswordRequest<'a> {
    pub(crate) current_password: &'a str,
    pub(crate) new_password: &'a str,
}

#[cfg(test)]
#[path = "tests/model_tests.rs"]
mod tests;
