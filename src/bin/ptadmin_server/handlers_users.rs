use super::*;

pub(super) async fn list_users(State(state): State<Arc<AppState>>) -> Json<UsersResponse> {
    let admins = state.admins.read().await;
    let mut users: Vec<AdminView> = admins.values().map(AdminView::from).collect();
    users.sort_by(|a, b| a.email.cmp(&b.email));
    Json(UsersResponse {
        success: true,
        users,
    })
}

pub(super) async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(subject): Extension<Subject>,
    Json(payload): Json<CreateAdminRequest>,
) -> Result<(StatusCode, Json<AdminCreatedResponse>), Response> {
    let email = normalize_email(&payload.email);
    validate_email(&email).map_err(invalid_input)?;
    validate_new_password(&payload.password).map_err(invalid_input)?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(bad_request("Name is required"));
    }
    let role = match payload.role.as_deref().map(str::trim) {
        None | Some("") => ADMIN_ROLE,
        Some(role) => role,
    };

    let password_hash = hash_password(&payload.password).map_err(internal_error)?;
    let record = new_admin_record(
        &email,
        name,
        role,
        password_hash,
        Some(subject.email.clone()),
    )
    .map_err(internal_error)?;
    let view = AdminView::from(&record);

    {
        let mut admins = state.admins.write().await;
        if admins.values().any(|a| a.email == email) {
            return Err(bad_request("User with this email already exists"));
        }
        admins.insert(record.id.clone(), record);
    }
    persist_admins(&state).await?;
    info!(%email, created_by = %subject.email, "admin created");

    Ok((
        StatusCode::CREATED,
        Json(AdminCreatedResponse {
            success: true,
            message: "Admin user created successfully",
            user: view,
        }),
    ))
}

/// `id` may be the admin id or its email.
pub(super) async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(subject): Extension<Subject>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, Response> {
    let as_email = normalize_email(&id);
    if id == subject.id || as_email == subject.email {
        return Err(bad_request("Cannot delete your own account"));
    }

    let removed = {
        let mut admins = state.admins.write().await;
        let key = if admins.contains_key(&id) {
            Some(id.clone())
        } else {
            admins
                .values()
                .find(|a| a.email == as_email)
                .map(|a| a.id.clone())
        };
        key.and_then(|key| admins.remove(&key))
    };
    let Some(removed) = removed else {
        return Err(not_found("User not found"));
    };
    persist_admins(&state).await?;
    info!(email = %removed.email, deleted_by = %subject.email, "admin deleted");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Admin user deleted successfully",
    })))
}
