use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ptadmin::{ClientConfig, Credentials};

pub const ADMIN_EMAIL: &str = "root@example.com";
pub const ADMIN_PASSWORD: &str = "root-password-1";
const JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub struct ServerGuard {
    pub base_url: String,
    data_dir: tempfile::TempDir,
    child: Child,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[allow(dead_code)]
impl ServerGuard {
    pub fn data_dir(&self) -> &Path {
        self.data_dir.path()
    }

    pub fn config(&self) -> Result<ClientConfig> {
        ClientConfig::new(&self.base_url)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(ADMIN_EMAIL, ADMIN_PASSWORD)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[derive(Clone, Debug)]
pub struct ServerOptions {
    pub access_ttl: String,
    pub rotate_refresh_tokens: bool,
    pub seed_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            access_ttl: "15m".to_string(),
            rotate_refresh_tokens: false,
            seed_admin: true,
        }
    }
}

pub fn spawn_server() -> Result<ServerGuard> {
    spawn_server_with(ServerOptions::default())
}

pub fn spawn_server_with(options: ServerOptions) -> Result<ServerGuard> {
    let data_dir = tempfile::tempdir().context("create server tempdir")?;
    let child = spawn_on(data_dir.path(), &options)?;
    let base_url = read_addr_file(&data_dir.path().join("addr.txt"))?;
    wait_for_health(&base_url)?;

    Ok(ServerGuard {
        base_url,
        data_dir,
        child,
    })
}

/// Stop the server and start a new one on the same data directory.
#[allow(dead_code)]
pub fn restart(server: &mut ServerGuard, options: ServerOptions) -> Result<()> {
    let _ = server.child.kill();
    let _ = server.child.wait();

    let addr_file = server.data_dir.path().join("addr.txt");
    let _ = std::fs::remove_file(&addr_file);
    server.child = spawn_on(server.data_dir.path(), &options)?;
    server.base_url = read_addr_file(&addr_file)?;
    wait_for_health(&server.base_url)
}

fn spawn_on(data_dir: &Path, options: &ServerOptions) -> Result<Child> {
    let addr_file: PathBuf = data_dir.join("addr.txt");
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ptadmin-server"));
    cmd.args(["--addr", "127.0.0.1:0"])
        .arg("--addr-file")
        .arg(&addr_file)
        .arg("--data-dir")
        .arg(data_dir)
        .args(["--jwt-secret", JWT_SECRET])
        .args(["--access-ttl", &options.access_ttl])
        .env_remove("JWT_SECRET")
        .env_remove("SEED_ADMIN_PASSWORD");
    if options.rotate_refresh_tokens {
        cmd.arg("--rotate-refresh-tokens");
    }
    if options.seed_admin {
        cmd.args(["--seed-admin-email", ADMIN_EMAIL])
            .args(["--seed-admin-password", ADMIN_PASSWORD]);
    }
    cmd.stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn ptadmin-server")
}

fn read_addr_file(addr_file: &Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(10) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }

        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(format!("http://{}", s));
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
}

pub fn wait_for_health(base_url: &str) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(10) {
            anyhow::bail!("server did not become healthy at {}/api/health", base_url);
        }
        match client.get(format!("{}/api/health", base_url)).send() {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => {
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}

#[allow(dead_code)]
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
