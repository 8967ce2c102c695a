use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Read-only view of the backend's admin storage.
pub trait AdminRepository {
    fn list(&self) -> Result<Vec<StoredAdmin>>;

    fn find_by_email(&self, email: &str) -> Result<Option<StoredAdmin>> {
        Ok(self.list()?.into_iter().find(|a| a.email == email))
    }
}

/// An admin record as persisted by the backend, hash included.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct StoredAdmin {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub password_hash: String,
    pub created_at: String,

    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
}

/// Reads `admins.json` from a `ptadmin-server` data directory.
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("admins.json"),
        }
    }
}

impl AdminRepository for JsonFileRepository {
    fn list(&self) -> Result<Vec<StoredAdmin>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let bytes =
            std::fs::read(&self.path).with_context(|| format!("read {}", self.path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parse {}", self.path.display()))
    }
}

#[cfg(test)]
#[path = "../tests/harness/repository_tests.rs"]
mod tests;
