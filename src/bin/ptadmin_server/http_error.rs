use super::*;

fn failure(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({"success": false, "message": message})),
    )
        .into_response()
}

pub(super) fn unauthorized(message: &str) -> Response {
    failure(StatusCode::UNAUTHORIZED, message)
}

pub(super) fn forbidden(message: &str) -> Response {
    failure(StatusCode::FORBIDDEN, message)
}

pub(super) fn bad_request(message: &str) -> Response {
    failure(StatusCode::BAD_REQUEST, message)
}

pub(super) fn invalid_input(err: anyhow::Error) -> Response {
    failure(StatusCode::BAD_REQUEST, &err.to_string())
}

pub(super) fn not_found(message: &str) -> Response {
    failure(StatusCode::NOT_FOUND, message)
}

pub(super) fn internal_error(err: anyhow::Error) -> Response {
    tracing::error!(error = %format!("{:#}", err), "request failed");
    failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}
