//! Admin user management and password change.

use tracing::info;

use super::*;
use crate::model::{AdminUser, ChangePasswordRequest, CreateUserResponse, NewAdmin, UsersResponse};

impl AdminClient {
    pub fn current_user(&self) -> Option<&AdminUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn list_users(&mut self) -> Result<Vec<AdminUser>, ApiError> {
        let url = self.url("/api/admin/users");
        let resp = self.send_authed("list users", |c| c.get(&url))?;
        let out: UsersResponse = Self::parse(resp, "list users")?;
        Ok(out.users)
    }

    pub fn create_user(&mut self, admin: &NewAdmin) -> Result<AdminUser, ApiError> {
        let url = self.url("/api/admin/users");
        let resp = self.send_authed("create user", |c| c.post(&url).json(admin))?;
        let out: CreateUserResponse = Self::parse(resp, "create user")?;
        info!(email = %out.user.email, "admin user created");
        Ok(out.user)
    }

    /// Delete an admin by id or email. Deleting yourself is a `Validation` error.
    pub fn delete_user(&mut self, id: &str) -> Result<(), ApiError> {
        let url = self.user_url(id)?;
        self.send_authed("delete user", |c| c.delete(url.clone()))?;
        info!(id, "admin user deleted");
        Ok(())
    }

    pub fn change_password(
        &mut self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let url = self.url("/api/admin/change-password");
        let body = ChangePasswordRequest {
            current_password,
            new_password,
        };
        self.send_authed("change password", |c| c.post(&url).json(&body))?;
        info!("password changed");
        Ok(())
    }

    fn user_url(&self, id: &str) -> Result<reqwest::Url, ApiError> {
        if id.is_empty() {
            return Err(ApiError::Validation("user id cannot be empty".to_string()));
        }
        let mut url = reqwest::Url::parse(&self.url("/api/admin/users"))
            .map_err(|e| ApiError::Validation(format!("invalid base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Validation("base url cannot carry a path".to_string()))?
            .push(id);
        Ok(url)
    }
}
