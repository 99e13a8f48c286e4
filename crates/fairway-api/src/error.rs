use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Request-level error taxonomy. The first five map to caller-correctable
/// HTTP statuses with the message echoed as `details`; `Internal` is logged
/// server-side and surfaced as a generic 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("You must be logged in")]
    Unauthenticated,

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Capacity(String),

    #[error("{0}")]
    NotConnected(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, label, details) = match &self {
            ApiError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Unauthorized", self.to_string())
            }
            ApiError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Bad Request", self.to_string()),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "Conflict", self.to_string()),
            ApiError::Capacity(_) => (StatusCode::CONFLICT, "Full", self.to_string()),
            ApiError::NotConnected(_) => (StatusCode::FORBIDDEN, "Not connected", self.to_string()),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found", self.to_string()),
            ApiError::Internal(e) => {
                error!("Internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    "Unexpected error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": label, "details": details }))).into_response()
    }
}
