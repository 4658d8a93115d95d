//! Request error taxonomy and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::store::StoreError;

/// Result type for game operations
pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced by the game core. Validation, authorization and phase
/// errors are raised before any mutation; storage errors may leave partial
/// state (see the reveal loop).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("room {0} not found")]
    RoomNotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    PhaseConflict(String),

    /// Lost a conditional update, e.g. a concurrent start or reveal.
    #[error("{0}")]
    Conflict(String),

    #[error("storage: {0}")]
    Storage(#[from] StoreError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::RoomNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::FORBIDDEN,
            AppError::PhaseConflict(_) | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Storage(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::RoomNotFound("CAMP".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Unauthorized("x".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::PhaseConflict("x".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_not_found_message_names_the_room() {
        let err = AppError::RoomNotFound("CAMP-FIRE".into());
        assert_eq!(err.to_string(), "room CAMP-FIRE not found");
    }
}
