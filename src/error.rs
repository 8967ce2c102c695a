use reqwest::StatusCode;

/// Failure kinds a caller of the admin API has to branch on.
///
/// `Unauthenticated` means no usable credential was presented; `Forbidden`
/// means one was presented and rejected.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("rejected: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("no active session (run `ptadmin login` first)")]
    NoSession,

    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("unexpected status {status}: {message}")]
    Unexpected { status: u16, message: String },

    #[error("decode response: {0}")]
    Decode(String),

    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    pub fn from_status(status: StatusCode, body: &serde_json::Value) -> Self {
        let message = body_message(body, status);
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthenticated(message),
            StatusCode::FORBIDDEN => ApiError::Forbidden(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ApiError::Validation(message)
            }
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            StatusCode::CONFLICT => ApiError::Conflict(message),
            other => ApiError::Unexpected {
                status: other.as_u16(),
                message,
            },
        }
    }

    /// HTTP status this error was built from, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::AuthenticationFailed(_) | ApiError::Unauthenticated(_) => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::Validation(_) => Some(400),
            ApiError::NotFound(_) => Some(404),
            ApiError::Conflict(_) => Some(409),
            ApiError::Unexpected { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            ApiError::NoSession | ApiError::MalformedToken(_) | ApiError::Decode(_) => None,
        }
    }
}

pub(crate) fn body_message(body: &serde_json::Value, status: StatusCode) -> String {
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_lowercase()
        })
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
