//! Error taxonomy shared by the store, the service and the HTTP layer.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Errors surfaced by TeamPulse operations.
///
/// None of these are retried automatically; each maps to one HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    /// Missing or malformed input.
    #[error("{0}")]
    InvalidArgument(String),

    /// Unknown session, title or id.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate session title.
    #[error("{0}")]
    Conflict(String),

    /// The underlying database failed.
    #[error("Storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

impl PulseError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand back to a client.
    pub fn public_message(&self) -> String {
        match self {
            Self::Storage(_) => "Internal storage error".to_string(),
            other => other.to_string(),
        }
    }
}

/// Unreadable or wrongly typed request bodies are plain bad input.
impl From<JsonRejection> for PulseError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidArgument(rejection.body_text())
    }
}

impl IntoResponse for PulseError {
    fn into_response(self) -> Response {
        if let Self::Storage(err) = &self {
            tracing::error!(name: "storage.failure", error = %err, "Storage operation failed");
        }

        (self.status_code(), Json(json!({ "error": self.public_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            PulseError::InvalidArgument("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PulseError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PulseError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            PulseError::Storage(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_detail_is_not_exposed() {
        let err = PulseError::Storage(sqlx::Error::PoolTimedOut);
        assert_eq!(err.public_message(), "Internal storage error");

        let err = PulseError::Conflict("Training session 'Warmup' already exists".into());
        assert_eq!(
            err.public_message(),
            "Training session 'Warmup' already exists"
        );
    }
}
