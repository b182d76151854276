//! Upgrade rejection errors

use ama_service::ServiceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Reasons a subscribe request is refused before the upgrade
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Origin not allowed in this environment
    #[error("Origin not allowed: {0}")]
    ForbiddenOrigin(String),

    /// Room id is not an integer
    #[error("Invalid room id: {0}")]
    InvalidRoomId(String),

    /// Plain HTTP request on a subscribe route
    #[error("WebSocket upgrade required")]
    UpgradeRequired,

    /// Room lookup failed
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl GatewayError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ForbiddenOrigin(_) => StatusCode::FORBIDDEN,
            Self::InvalidRoomId(_) => StatusCode::BAD_REQUEST,
            Self::UpgradeRequired => StatusCode::UPGRADE_REQUIRED,
            Self::Service(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::ForbiddenOrigin(_) => "FORBIDDEN_ORIGIN",
            Self::InvalidRoomId(_) => "INVALID_ROOM_ID",
            Self::UpgradeRequired => "UPGRADE_REQUIRED",
            Self::Service(e) => e.error_code(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Subscribe request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Subscribe request rejected");
        }

        let body = json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        });

        (status, Json(body)).into_response()
    }
}
