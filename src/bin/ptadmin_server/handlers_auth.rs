use super::*;

const REFRESH_REJECTED: &str = "Invalid or expired refresh token";

/// Create the first admin. Refused once any admin exists.
pub(super) async fn setup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SetupRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), Response> {
    let email = normalize_email(&payload.email);
    validate_email(&email).map_err(invalid_input)?;
    validate_new_password(&payload.password).map_err(invalid_input)?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(bad_request("Name is required"));
    }

    let password_hash = hash_password(&payload.password).map_err(internal_error)?;
    let record = new_admin_record(&email, name, ADMIN_ROLE, password_hash, None)
        .map_err(internal_error)?;

    {
        let mut admins = state.admins.write().await;
        if !admins.is_empty() {
            return Err(bad_request("Admin user already exists. Use login instead."));
        }
        admins.insert(record.id.clone(), record);
    }
    persist_admins(&state).await?;
    info!(%email, "initial admin created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "message": "Admin user created successfully",
            "email": email,
        })),
    ))
}

/// Unknown email and wrong password produce the same 401.
pub(super) async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, Response> {
    let email = normalize_email(&payload.email);
    if validate_email(&email).is_err() || payload.password.is_empty() {
        return Err(bad_request("Invalid credentials"));
    }

    let admin = {
        let admins = state.admins.read().await;
        admins.values().find(|a| a.email == email).cloned()
    };
    let Some(mut admin) =
        admin.filter(|a| verify_password(&payload.password, &a.password_hash))
    else {
        warn!(%email, "admin login failed");
        return Err(unauthorized("Invalid credentials"));
    };

    let access_token = state
        .tokens
        .issue(&admin, TokenKind::Access)
        .map_err(internal_error)?;
    let refresh_token = state
        .tokens
        .issue(&admin, TokenKind::Refresh)
        .map_err(internal_error)?;

    let last_login = now_ts();
    {
        let mut admins = state.admins.write().await;
        if let Some(stored) = admins.get_mut(&admin.id) {
            stored.last_login = Some(last_login.clone());
        }
    }
    persist_admins(&state).await?;
    admin.last_login = Some(last_login);
    info!(%email, "admin login successful");

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful",
        access_token,
        refresh_token,
        user: AdminView::from(&admin),
    }))
}

/// Missing refresh token is 401; one that fails verification, was retired by
/// rotation, or belongs to a deleted admin is 403.
pub(super) async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, Response> {
    let Some(presented) = payload.refresh_token.filter(|t| !t.is_empty()) else {
        return Err(unauthorized("Refresh token required"));
    };

    let claims = state
        .tokens
        .verify(&presented, TokenKind::Refresh)
        .map_err(|err| {
            warn!(error = %err, "refresh token rejected");
            forbidden(REFRESH_REJECTED)
        })?;

    let presented_fingerprint = fingerprint(&presented);
    if state
        .revoked_refresh
        .read()
        .await
        .contains_key(&presented_fingerprint)
    {
        warn!(email = %claims.email, "retired refresh token presented");
        return Err(forbidden(REFRESH_REJECTED));
    }

    let admin = {
        let admins = state.admins.read().await;
        admins.get(&claims.sub).cloned()
    };
    let Some(admin) = admin else {
        warn!(email = %claims.email, "refresh token for a deleted admin");
        return Err(forbidden(REFRESH_REJECTED));
    };

    let access_token = state
        .tokens
        .issue(&admin, TokenKind::Access)
        .map_err(internal_error)?;

    let refresh_token = if state.rotate_refresh_tokens {
        let next = state
            .tokens
            .issue(&admin, TokenKind::Refresh)
            .map_err(internal_error)?;
        let mut revoked = state.revoked_refresh.write().await;
        prune_revoked(&mut revoked, time::OffsetDateTime::now_utc().unix_timestamp());
        // A concurrent refresh may have retired it since the read above.
        if revoked
            .insert(presented_fingerprint, claims.exp)
            .is_some()
        {
            return Err(forbidden(REFRESH_REJECTED));
        }
        persist_revoked_to_disk(&state.data_dir, &revoked).map_err(internal_error)?;
        Some(next)
    } else {
        None
    };

    info!(email = %admin.email, rotated = refresh_token.is_some(), "access token refreshed");
    Ok(Json(RefreshResponse {
        success: true,
        access_token,
        refresh_token,
    }))
}

pub(super) async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(subject): Extension<Subject>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>, Response> {
    if payload.current_password.is_empty() {
        return Err(bad_request("Current password is required"));
    }
    validate_new_password(&payload.new_password).map_err(invalid_input)?;

    let current_hash = {
        let admins = state.admins.read().await;
        admins.get(&subject.id).map(|a| a.password_hash.clone())
    };
    let Some(current_hash) = current_hash else {
        return Err(not_found("User not found"));
    };
    if !verify_password(&payload.current_password, &current_hash) {
        warn!(email = %subject.email, "password change with wrong current password");
        return Err(unauthorized("Current password is incorrect"));
    }

    let new_hash = hash_password(&payload.new_password).map_err(internal_error)?;
    {
        let mut admins = state.admins.write().await;
        let Some(admin) = admins.get_mut(&subject.id) else {
            return Err(not_found("User not found"));
        };
        admin.password_hash = new_hash;
        admin.updated_at = Some(now_ts());
    }
    persist_admins(&state).await?;
    info!(email = %subject.email, "admin password changed");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Password changed successfully",
    })))
}
