pub(super) const ADMIN_ROLE: &str = "admin";

/// Admin account as stored in `admins.json`.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub(super) struct AdminRecord {
    pub(super) id: String,
    pub(super) email: String,
    pub(super) name: String,
    pub(super) role: String,
    pub(super) password_hash: String,
    pub(super) created_at: String,

    #[serde(default)]
    pub(super) created_by: Option<String>,

    #[serde(default)]
    pub(super) updated_at: Option<String>,

    #[serde(default)]
    pub(super) last_login: Option<String>,
}

/// Admin as returned over the wire; never carries the password hash.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AdminView {
    pub(super) id: String,
    pub(super) email: String,
    pub(super) name: String,
    pub(super) role: String,
    pub(super) created_at: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) created_by: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) last_login: Option<String>,
}

impl From<&AdminRecord> for AdminView {
    fn from(a: &AdminRecord) -> Self {
        Self {
            id: a.id.clone(),
            email: a.email.clone(),
            name: a.name.clone(),
            role: a.role.clone(),
            created_at: a.created_at.clone(),
            created_by: a.created_by.clone(),
            last_login: a.last_login.clone(),
        }
    }
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct LoginRequest {
    #[serde(default)]
    pub(super) email: String,
    #[serde(default)]
    pub(super) password: String,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LoginResponse {
    pub(super) success: bool,
    pub(super) message: &'static str,
    pub(super) access_token: String,
    pub(super) refresh_token: String,
    pub(super) user: AdminView,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RefreshRequest {
    #[serde(default)]
    pub(super) refresh_token: Option<String>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RefreshResponse {
    pub(super) success: bool,
    pub(super) access_token: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) refresh_token: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ChangePasswordRequest {
    #[serde(default)]
    pub(super) current_password: String,
    #[serde(default)]
    pub(super) new_password: String,
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct CreateAdminRequest {
    #[serde(default)]
    pub(super) email: String,
    #[serde(default)]
    pub(super) password: String,
    #[serde(default)]
    pub(super) name: String,
    #[serde(default)]
    pub(super) role: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub(super) struct UsersResponse {
    pub(super) success: bool,
    pub(super) users: Vec<AdminView>,
}

#[derive(Debug, serde::Serialize)]
pub(super) struct AdminCreatedResponse {
    pub(super) success: bool,
    pub(super) message: &'static str,
    pub(super) user: AdminView,
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct SetupRequest {
    #[serde(default)]
    pub(super) email: String,
    #[serde(default)]
    pub(super) password: String,
    #[serde(default)]
    pub(super) name: String,
}

/// A refresh token retired by rotation, kept until it would have expired anyway.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub(super) struct RevokedRefresh {
    pub(super) fingerprint: String,
    pub(super) expires_at: i64,
}
