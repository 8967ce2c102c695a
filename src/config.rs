//! Client configuration and the on-disk session used by the CLI.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::session::Session;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,

    /// Refresh before sending when the access token expires within this many seconds.
    pub expiry_skew_secs: i64,

    /// When false the client only refreshes after the backend rejects an expired token.
    pub proactive_refresh: bool,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            anyhow::bail!("base url cannot be empty");
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            anyhow::bail!("base url must start with http:// or https:// (got {})", base_url);
        }
        Ok(Self {
            base_url,
            user_agent: format!("ptadmin/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
            expiry_skew_secs: 5,
            proactive_refresh: true,
        })
    }

    pub fn with_expiry_skew(mut self, secs: i64) -> Self {
        self.expiry_skew_secs = secs;
        self
    }

    pub fn reactive_only(mut self) -> Self {
        self.proactive_refresh = false;
        self
    }
}

/// JSON file holding the CLI's current session between invocations.
pub struct SessionFile {
    path: PathBuf,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct StoredSession {
    base_url: String,
    session: Session,
}

impl SessionFile {
    pub fn in_dir(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join("session.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored session if it was issued by `base_url`.
    pub fn load(&self, base_url: &str) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        let stored: StoredSession = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse {}", self.path.display()))?;
        if stored.base_url != base_url {
            tracing::warn!(
                stored = %stored.base_url,
                requested = %base_url,
                "stored session belongs to another backend; ignoring it"
            );
            return Ok(None);
        }
        Ok(Some(stored.session))
    }

    pub fn save(&self, base_url: &str, session: &Session) -> Result<()> {
        let stored = StoredSession {
            base_url: base_url.to_string(),
            session: session.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&stored).context("serialize session")?;
        write_atomic_overwrite(&self.path, &bytes)
            .with_context(|| format!("write {}", self.path.display()))
    }

    /// Returns whether a session file existed.
    pub fn remove(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("remove {}", self.path.display())),
        }
    }
}

/// Write `bytes` to a hidden sibling of `path`, then rename it into place.
/// The temp file is removed when the rename fails.
pub fn write_atomic_overwrite(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).with_context(|| format!("create dir {}", dir.display()))?;

    let file_name = path
        .file_name()
        .with_context(|| format!("{} has no file name", path.display()))?;
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(format!(".{}.tmp", std::process::id()));
    let tmp = dir.join(tmp_name);

    std::fs::write(&tmp, bytes).with_context(|| format!("write {}", tmp.display()))?;
    if let Err(err) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(err).with_context(|| format!("replace {}", path.display()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
