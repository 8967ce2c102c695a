use anyhow::{Context, Result, ensure};
use reqwest::{Method, StatusCode};

use super::Target;
use crate::client::{AdminClient, Probe};
use crate::error::ApiError;
use crate::harness::{TestContext, unique_suffix};
use crate::model::{Credentials, NewAdmin, TokenClaims, unix_now};

pub(super) type Check = fn(&Target, &mut TestContext) -> Result<()>;

const GARBLED_BEARER: &str = "Bearer garbled.token.value";

pub(super) fn suite(target: &Target) -> Vec<(&'static str, Check)> {
    let mut out: Vec<(&'static str, Check)> = vec![
        ("login issues a JWT pair with future expiry", login_issues_jwt_pair as Check),
        ("wrong password is rejected with 401", wrong_password_is_unauthenticated as Check),
        ("unknown email is rejected with 401", unknown_email_is_unauthenticated as Check),
        ("invalid refresh token is rejected with 403", invalid_refresh_is_forbidden as Check),
        ("refreshing twice yields two valid access tokens", refresh_twice_yields_distinct_tokens as Check),
        ("protected endpoints: missing token 401, garbled token 403", gate_distinguishes_missing_and_garbled as Check),
        ("deleting your own account is rejected with 400", self_deletion_is_rejected as Check),
        ("deleting another admin removes it", deleting_another_admin_removes_it as Check),
    ];
    if target.rotate_password.is_some() {
        out.push(("password change round trip", password_change_round_trip as Check));
    }
    out
}

fn expect_status(probe: &Probe, want: StatusCode, what: &str) -> Result<()> {
    ensure!(
        probe.status == want,
        "{}: expected {}, got {} ({})",
        what,
        want.as_u16(),
        probe.status.as_u16(),
        probe.body
    );
    Ok(())
}

fn fresh_client(target: &Target) -> Result<AdminClient> {
    Ok(AdminClient::new(target.config.clone())?)
}

fn login_issues_jwt_pair(target: &Target, _ctx: &mut TestContext) -> Result<()> {
    let mut client = fresh_client(target)?;
    let session = client.login(&target.credentials)?;
    let now = unix_now();
    for (label, token) in [
        ("access", &session.tokens().access_token),
        ("refresh", &session.tokens().refresh_token),
    ] {
        let claims = TokenClaims::decode(token).with_context(|| format!("decode {} token", label))?;
        ensure!(
            claims.exp > now,
            "{} token exp {} is not after now ({})",
            label,
            claims.exp,
            now
        );
    }
    Ok(())
}

fn wrong_password_is_unauthenticated(target: &Target, ctx: &mut TestContext) -> Result<()> {
    let body = serde_json::json!({
        "email": target.credentials.email,
        "password": format!("{}-wrong", target.credentials.password),
    });
    let probe = ctx
        .client()
        .probe(Method::POST, "/api/admin/login", None, Some(&body))?;
    expect_status(&probe, StatusCode::UNAUTHORIZED, "login with wrong password")
}

fn unknown_email_is_unauthenticated(target: &Target, ctx: &mut TestContext) -> Result<()> {
    let body = serde_json::json!({
        "email": format!("verify-missing-{}@example.invalid", unique_suffix()),
        "password": target.credentials.password,
    });
    let probe = ctx
        .client()
        .probe(Method::POST, "/api/admin/login", None, Some(&body))?;
    expect_status(&probe, StatusCode::UNAUTHORIZED, "login with unknown email")
}

fn invalid_refresh_is_forbidden(_target: &Target, ctx: &mut TestContext) -> Result<()> {
    let body = serde_json::json!({"refreshToken": "invalid.token.here"});
    let probe = ctx
        .client()
        .probe(Method::POST, "/api/admin/refresh", None, Some(&body))?;
    expect_status(&probe, StatusCode::FORBIDDEN, "refresh with invalid token")?;
    ensure!(
        probe.body.get("accessToken").is_none(),
        "rejected refresh still carried an accessToken"
    );
    Ok(())
}

// Uses its own login so a rotating backend cannot invalidate the context's session.
fn refresh_twice_yields_distinct_tokens(target: &Target, _ctx: &mut TestContext) -> Result<()> {
    let mut client = fresh_client(target)?;
    let mut refresh_token = client.login(&target.credentials)?.refresh_token().to_string();

    let mut access_tokens = Vec::new();
    for round in 1..=2 {
        let body = serde_json::json!({"refreshToken": refresh_token});
        let probe = client.probe(Method::POST, "/api/admin/refresh", None, Some(&body))?;
        expect_status(&probe, StatusCode::OK, &format!("refresh #{}", round))?;
        let access = probe
            .field_str("accessToken")
            .context("refresh response missing accessToken")?
            .to_string();
        if let Some(rotated) = probe.field_str("refreshToken") {
            refresh_token = rotated.to_string();
        }
        access_tokens.push(access);
    }

    ensure!(
        access_tokens[0] != access_tokens[1],
        "two refreshes returned the same access token"
    );
    for (i, token) in access_tokens.iter().enumerate() {
        let probe = client.probe(
            Method::GET,
            "/api/admin/users",
            Some(&format!("Bearer {}", token)),
            None,
        )?;
        expect_status(
            &probe,
            StatusCode::OK,
            &format!("protected call with refreshed token #{}", i + 1),
        )?;
    }
    Ok(())
}

fn gate_distinguishes_missing_and_garbled(_target: &Target, ctx: &mut TestContext) -> Result<()> {
    let endpoints = [
        (Method::GET, "/api/admin/users".to_string()),
        (Method::POST, "/api/admin/users".to_string()),
        (Method::POST, "/api/admin/change-password".to_string()),
        (
            Method::DELETE,
            format!("/api/admin/users/verify-nobody-{}@example.invalid", unique_suffix()),
        ),
    ];
    for (method, path) in endpoints {
        let missing = ctx.client().probe(method.clone(), &path, None, None)?;
        expect_status(
            &missing,
            StatusCode::UNAUTHORIZED,
            &format!("{} {} without Authorization", method, path),
        )?;
        let garbled = ctx
            .client()
            .probe(method.clone(), &path, Some(GARBLED_BEARER), None)?;
        expect_status(
            &garbled,
            StatusCode::FORBIDDEN,
            &format!("{} {} with a garbled bearer token", method, path),
        )?;
    }
    Ok(())
}

fn self_deletion_is_rejected(_target: &Target, ctx: &mut TestContext) -> Result<()> {
    let own = ctx
        .client()
        .current_user()
        .map(|u| u.email.clone())
        .context("context has no session user")?;

    match ctx.client().delete_user(&own) {
        Err(ApiError::Validation(_)) => {}
        Ok(()) => anyhow::bail!("backend deleted the caller's own account"),
        Err(other) => anyhow::bail!("expected a 400 rejection, got: {}", other),
    }

    let users = ctx.client().list_users()?;
    ensure!(
        users.iter().any(|u| u.email == own),
        "own account missing from the user list after the rejected delete"
    );
    if let Some(repo) = ctx.repository() {
        ensure!(
            repo.find_by_email(&own)?.is_some(),
            "own account missing from storage after the rejected delete"
        );
    }
    Ok(())
}

fn deleting_another_admin_removes_it(_target: &Target, ctx: &mut TestContext) -> Result<()> {
    let suffix = unique_suffix();
    let email = format!("verify-{}@example.invalid", suffix);
    let creator = ctx.client().current_user().map(|u| u.email.clone());

    let password = format!("Verify-{}-pass", suffix);
    ctx.create_admin(&NewAdmin {
        email: email.clone(),
        password: password.clone(),
        name: "Verify Suite".to_string(),
        role: None,
    })?;
    ensure!(
        ctx.client().list_users()?.iter().any(|u| u.email == email),
        "created admin missing from the user list"
    );
    if let Some(repo) = ctx.repository() {
        let stored = repo
            .find_by_email(&email)?
            .context("created admin missing from storage")?;
        ensure!(
            stored.created_by == creator,
            "stored created_by is {:?}, expected {:?}",
            stored.created_by,
            creator
        );
        ensure!(
            !stored.password_hash.is_empty() && stored.password_hash != password,
            "stored password is not hashed"
        );
    }

    ctx.delete_admin(&email)?;
    ensure!(
        !ctx.client().list_users()?.iter().any(|u| u.email == email),
        "deleted admin still present in the user list"
    );
    if let Some(repo) = ctx.repository() {
        ensure!(
            repo.find_by_email(&email)?.is_none(),
            "deleted admin still present in storage"
        );
    }
    Ok(())
}

fn password_change_round_trip(target: &Target, ctx: &mut TestContext) -> Result<()> {
    let new_password = target
        .rotate_password
        .as_deref()
        .context("no rotation password configured")?;
    let original = &target.credentials;

    ctx.client()
        .change_password(&original.password, new_password)
        .context("change to the rotation password")?;

    let rotated = Credentials::new(original.email.clone(), new_password);
    let checked = (|| -> Result<()> {
        fresh_client(target)?
            .login(&rotated)
            .context("login with the new password")?;
        match fresh_client(target)?.login(original) {
            Err(ApiError::AuthenticationFailed(_)) => Ok(()),
            Ok(_) => anyhow::bail!("old password still accepted after the change"),
            Err(other) => anyhow::bail!("login with the old password: {}", other),
        }
    })();

    let restored = ctx
        .client()
        .change_password(new_password, &original.password)
        .context("restore the original password");

    checked?;
    restored?;
    fresh_client(target)?
        .login(original)
        .context("login with the restored password")?;
    Ok(())
}
