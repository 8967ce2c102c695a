use super::*;

/// Routes behind the admin gate.
pub(super) fn authed_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/change-password", post(change_password))
        .route("/api/admin/users", get(list_users).post(create_user))
        .route("/api/admin/users/:id", delete(delete_user))
        .layer(middleware::from_fn_with_state(state, require_admin))
}
