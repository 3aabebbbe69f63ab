use axum::{http::StatusCode, response::IntoResponse, Json};
use thiserror::Error;
use tracing::error;

/// Outcome kinds for repository operations. Handlers translate these to
/// HTTP status codes; nothing in this taxonomy is fatal to the process.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Missing or malformed input, fixable by the caller.
    #[error("{0}")]
    Validation(String),
    /// Uniqueness violation (duplicate username or id-number).
    #[error("{0}")]
    Conflict(String),
    /// Status change refused by the workflow rules.
    #[error("{0}")]
    Transition(String),
    /// Unknown username or wrong password; the two are indistinguishable.
    #[error("Invalid username or password")]
    Unauthorized,
    /// No matching record after trying every identifier form.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// The store call itself failed.
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl RepoError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RepoError::Validation(_) | RepoError::Transition(_) => StatusCode::BAD_REQUEST,
            RepoError::Conflict(_) => StatusCode::CONFLICT,
            RepoError::Unauthorized => StatusCode::UNAUTHORIZED,
            RepoError::NotFound(_) => StatusCode::NOT_FOUND,
            RepoError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error body in the shape the frontend expects:
/// `{"message": ..., "error": ..., "missing_fields": [...]}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub detail: Option<String>,
    pub missing_fields: Option<Vec<&'static str>>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            detail: None,
            missing_fields: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn missing(fields: Vec<&'static str>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Missing required fields".into(),
            detail: Some(format!("Missing fields: {}", fields.join(", "))),
            missing_fields: Some(fields),
        }
    }

    /// Attach an endpoint-specific headline to a repository outcome.
    pub fn from_repo(message: &str, err: RepoError) -> Self {
        if let RepoError::Store(e) = &err {
            error!(error = %e, "store call failed");
        }
        Self {
            status: err.status_code(),
            message: message.into(),
            detail: Some(err.to_string()),
            missing_fields: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let mut body = serde_json::json!({ "message": self.message });
        if let Some(detail) = self.detail {
            body["error"] = serde_json::json!(detail);
        }
        if let Some(fields) = self.missing_fields {
            body["missing_fields"] = serde_json::json!(fields);
        }
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_error_status_mapping() {
        assert_eq!(
            RepoError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RepoError::Transition("no".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RepoError::Conflict("dup".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(RepoError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            RepoError::NotFound("appointment").status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn unauthorized_message_does_not_leak_the_cause() {
        // Same text whether the username was unknown or the password wrong.
        assert_eq!(RepoError::Unauthorized.to_string(), "Invalid username or password");
    }

    #[test]
    fn missing_fields_body_lists_the_fields() {
        let err = ApiError::missing(vec!["username", "password"]);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.detail.as_deref(),
            Some("Missing fields: username, password")
        );
        assert_eq!(err.missing_fields, Some(vec!["username", "password"]));
    }
}
