#![allow(clippy::result_large_err)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Extension, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use clap::Parser;
use tokio::sync::RwLock;
use tracing::{info, warn};

#[path = "ptadmin_server/types.rs"]
mod types;
use self::types::*;
#[path = "ptadmin_server/identity_store.rs"]
mod identity_store;
use self::identity_store::*;
#[path = "ptadmin_server/passwords.rs"]
mod passwords;
use self::passwords::*;
#[path = "ptadmin_server/tokens.rs"]
mod tokens;
use self::tokens::*;
#[path = "ptadmin_server/validators.rs"]
mod validators;
use self::validators::*;
#[path = "ptadmin_server/http_error.rs"]
mod http_error;
use self::http_error::*;
#[path = "ptadmin_server/handlers_auth.rs"]
mod handlers_auth;
use self::handlers_auth::*;
#[path = "ptadmin_server/handlers_users.rs"]
mod handlers_users;
use self::handlers_users::*;
#[path = "ptadmin_server/routes.rs"]
mod routes;
use self::routes::*;
#[path = "ptadmin_server/runtime.rs"]
mod runtime;

/// The admin a verified access token speaks for.
#[derive(Clone, Debug)]
struct Subject {
    id: String,
    email: String,
}

#[derive(Clone)]
struct AppState {
    data_dir: PathBuf,

    // Keyed by admin id.
    admins: Arc<RwLock<HashMap<String, AdminRecord>>>,

    // blake3 fingerprint -> exp of refresh tokens retired by rotation.
    revoked_refresh: Arc<RwLock<HashMap<String, i64>>>,

    tokens: Arc<TokenIssuer>,
    rotate_refresh_tokens: bool,
}

#[derive(Parser)]
#[command(name = "ptadmin-server")]
#[command(about = "Reference admin auth backend (development)", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8001")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// Data directory holding admins.json and revoked_refresh.json
    #[arg(long, default_value = "./ptadmin-data")]
    data_dir: PathBuf,

    /// HS256 signing secret (at least 32 characters)
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Access token lifetime, e.g. 30s, 15m, 1h
    #[arg(long, env = "JWT_ACCESS_EXPIRY", default_value = "15m")]
    access_ttl: String,

    /// Refresh token lifetime, e.g. 12h, 7d
    #[arg(long, env = "JWT_REFRESH_EXPIRY", default_value = "7d")]
    refresh_ttl: String,

    /// Issue a new refresh token on every refresh and retire the presented one
    #[arg(long)]
    rotate_refresh_tokens: bool,

    /// Seed this admin when the store is empty
    #[arg(long, requires = "seed_admin_password")]
    seed_admin_email: Option<String>,

    #[arg(long, env = "SEED_ADMIN_PASSWORD", hide_env_values = true)]
    seed_admin_password: Option<String>,

    #[arg(long, default_value = "Admin")]
    seed_admin_name: String,
}

#[tokio::main]
async fn main() {
    ptadmin::logging::init("ptadmin_server=info");
    if let Err(err) = run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    validate_jwt_secret(&args.jwt_secret).context("invalid --jwt-secret")?;
    let access_ttl = parse_ttl(&args.access_ttl).context("invalid --access-ttl")?;
    let refresh_ttl = parse_ttl(&args.refresh_ttl).context("invalid --refresh-ttl")?;
    if refresh_ttl <= access_ttl {
        warn!(
            access_ttl,
            refresh_ttl, "refresh tokens expire no later than access tokens"
        );
    }

    std::fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("create data dir {}", args.data_dir.display()))?;

    let admins = runtime::load_or_seed_admins(&args).context("load admins")?;
    let revoked = load_revoked_from_disk(&args.data_dir).context("load revoked refresh tokens")?;

    let state = Arc::new(AppState {
        data_dir: args.data_dir.clone(),
        admins: Arc::new(RwLock::new(admins)),
        revoked_refresh: Arc::new(RwLock::new(revoked)),
        tokens: Arc::new(TokenIssuer::new(&args.jwt_secret, access_ttl, refresh_ttl)),
        rotate_refresh_tokens: args.rotate_refresh_tokens,
    });

    let authed = authed_router(state.clone());

    let app = Router::new()
        .route("/api/health", get(healthz))
        .route("/api/admin/setup", post(setup))
        .route("/api/admin/login", post(login))
        .route("/api/admin/refresh", post(refresh))
        .merge(authed)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    info!(
        %local_addr,
        rotate_refresh_tokens = args.rotate_refresh_tokens,
        "ptadmin-server listening"
    );

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

/// Gate for every `/api/admin/*` route except login, refresh and setup.
///
/// No readable bearer token is 401; a token that fails verification, is not
/// an access token, or does not carry the admin role is 403.
async fn require_admin(
    State(state): State<Arc<AppState>>,
    req: axum::extract::Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(req.headers()) else {
        return unauthorized("Access token required");
    };

    let claims = match state.tokens.verify(token, TokenKind::Access) {
        Ok(claims) => claims,
        Err(err) => {
            warn!(error = %err, "access token rejected");
            return forbidden("Invalid or expired token");
        }
    };
    if claims.role != ADMIN_ROLE {
        return forbidden("Admin access required");
    }

    let mut req = req;
    req.extensions_mut().insert(Subject {
        id: claims.sub,
        email: claims.email,
    });
    next.run(req).await
}

/// Second space-separated part of the Authorization header, if any.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value.split(' ').nth(1).filter(|t| !t.is_empty())
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

#[cfg(test)]
#[path = "../tests/bin/ptadmin_server/gate_tests.rs"]
mod tests;
