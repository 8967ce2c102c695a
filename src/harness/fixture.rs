use anyhow::Result;
use tracing::{debug, warn};

use super::repository::AdminRepository;
use crate::client::AdminClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::model::{AdminUser, Credentials, NewAdmin};

pub struct TestContext {
    client: AdminClient,
    created: Vec<String>,
    repository: Option<Box<dyn AdminRepository>>,
}

impl TestContext {
    /// Log in and start tracking resources. `repository` is optional because
    /// remote backends usually do not expose their storage.
    pub fn login(
        config: ClientConfig,
        credentials: &Credentials,
        repository: Option<Box<dyn AdminRepository>>,
    ) -> Result<Self, ApiError> {
        let mut client = AdminClient::new(config)?;
        client.login(credentials)?;
        Ok(Self {
            client,
            created: Vec::new(),
            repository,
        })
    }

    pub fn client(&mut self) -> &mut AdminClient {
        &mut self.client
    }

    pub fn repository(&self) -> Option<&dyn AdminRepository> {
        self.repository.as_deref()
    }

    /// Emails of accounts this context still owns.
    pub fn created(&self) -> &[String] {
        &self.created
    }

    pub fn create_admin(&mut self, admin: &NewAdmin) -> Result<AdminUser, ApiError> {
        let user = self.client.create_user(admin)?;
        self.created.push(user.email.clone());
        Ok(user)
    }

    /// Delete an account through the API and stop tracking it.
    pub fn delete_admin(&mut self, email: &str) -> Result<(), ApiError> {
        self.client.delete_user(email)?;
        self.created.retain(|e| e != email);
        Ok(())
    }

    /// Delete every tracked account. Accounts that are already gone count as
    /// cleaned up; other failures are returned and the account stays tracked.
    pub fn teardown(&mut self) -> Vec<(String, ApiError)> {
        let mut failures = Vec::new();
        for email in std::mem::take(&mut self.created) {
            match self.client.delete_user(&email) {
                Ok(()) | Err(ApiError::NotFound(_)) => {
                    debug!(%email, "teardown removed admin");
                }
                Err(err) => {
                    warn!(%email, error = %err, "teardown could not remove admin");
                    failures.push((email, err));
                }
            }
        }
        self.created = failures.iter().map(|(e, _)| e.clone()).collect();
        failures
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if !self.created.is_empty() {
            let _ = self.teardown();
        }
    }
}

/// Run `body` with `ctx`, then tear down before returning, whatever `body` did.
/// Teardown failures turn a passing body into an error.
pub fn with_context<T>(
    mut ctx: TestContext,
    body: impl FnOnce(&mut TestContext) -> Result<T>,
) -> Result<T> {
    let out = body(&mut ctx);
    let failures = ctx.teardown();
    let out = out?;
    if let Some((email, err)) = failures.into_iter().next() {
        anyhow::bail!("teardown failed for {}: {}", email, err);
    }
    Ok(out)
}
