pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard error response structure.
///
/// Returned for every error response:
/// - `code`: integer error code for logging/monitoring (e.g., 6003)
/// - `error`: machine-readable identifier (e.g., "VERSION_CONFLICT")
/// - `message`: human-readable message
/// - `details`: optional structured details (e.g., validation field errors)
///
/// ```json
/// {
///   "code": 1004,
///   "error": "NOT_FOUND",
///   "message": "Product 1712 not found",
///   "details": null
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details (e.g., validation field errors)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON parsing error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Version conflict: {0}")]
    VersionConflict(String),

    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Upstream rejected: {0}")]
    UpstreamRejected(String),

    #[error("Storage corrupt: {0}")]
    StorageCorrupt(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// Status, code, message and details for this error, logging it at a
    /// level that matches who is at fault.
    fn into_parts(self) -> (StatusCode, ErrorCode, String, Option<serde_json::Value>) {
        match self {
            AppError::SerdeJson(e) => {
                tracing::error!(error_code = ErrorCode::SerdeJsonError.code(), "JSON error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::SerdeJsonError,
                    ErrorCode::SerdeJsonError.default_message().to_string(),
                    None,
                )
            }
            AppError::Io(e) => {
                tracing::error!(error_code = ErrorCode::IoError.code(), "I/O error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::IoError,
                    ErrorCode::IoError.default_message().to_string(),
                    None,
                )
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = ErrorCode::JsonExtraction.code(), "JSON extraction error: {:?}", e);
                (e.status(), ErrorCode::JsonExtraction, e.body_text(), None)
            }
            AppError::ValidationError(e) => {
                tracing::info!(error_code = ErrorCode::ValidationError.code(), "Validation error: {:?}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValidationError,
                    ErrorCode::ValidationError.default_message().to_string(),
                    Some(serde_json::to_value(&e).unwrap_or(serde_json::Value::Null)),
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, ErrorCode::ValidationError, msg, None)
            }
            AppError::Unauthorized(msg) => {
                tracing::info!("Unauthorized: {}", msg);
                (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, msg, None)
            }
            AppError::Forbidden(msg) => {
                tracing::info!("Forbidden: {}", msg);
                (StatusCode::FORBIDDEN, ErrorCode::Forbidden, msg, None)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg, None)
            }
            AppError::VersionConflict(msg) => {
                tracing::warn!(error_code = ErrorCode::VersionConflict.code(), "Version conflict: {}", msg);
                (StatusCode::CONFLICT, ErrorCode::VersionConflict, msg, None)
            }
            AppError::PayloadTooLarge(msg) => {
                tracing::info!("Payload too large: {}", msg);
                (StatusCode::PAYLOAD_TOO_LARGE, ErrorCode::PayloadTooLarge, msg, None)
            }
            AppError::UpstreamUnavailable(msg) => {
                tracing::error!(error_code = ErrorCode::UpstreamUnavailable.code(), "Upstream unavailable: {}", msg);
                (StatusCode::BAD_GATEWAY, ErrorCode::UpstreamUnavailable, msg, None)
            }
            AppError::UpstreamRejected(msg) => {
                tracing::error!(error_code = ErrorCode::UpstreamRejected.code(), "Upstream rejected: {}", msg);
                (StatusCode::BAD_GATEWAY, ErrorCode::UpstreamRejected, msg, None)
            }
            AppError::StorageCorrupt(msg) => {
                tracing::error!(error_code = ErrorCode::StorageCorrupt.code(), "Storage corrupt: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::StorageCorrupt, msg, None)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code = ErrorCode::InternalError.code(), "Internal server error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError, msg, None)
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::ServiceUnavailable, msg, None)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = self.into_parts();
        let mut body = ErrorResponse::new(code, message);
        body.details = details;
        (status, Json(body)).into_response()
    }
}

/// Helper function to create error responses outside of `AppError`.
///
/// ```rust,ignore
/// use axum_helpers::errors::{error_response, ErrorCode};
/// use axum::http::StatusCode;
///
/// let response = error_response(
///     StatusCode::UNAUTHORIZED,
///     "Invalid token".to_string(),
///     ErrorCode::Unauthorized,
/// );
/// ```
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    (status, Json(ErrorResponse::new(error_code, message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(error: AppError) -> (StatusCode, ErrorResponse) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let (status, body) = body_of(AppError::NotFound("Product 7 not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, 1004);
        assert_eq!(body.error, "NOT_FOUND");
        assert_eq!(body.message, "Product 7 not found");
        assert!(body.details.is_none());
    }

    #[tokio::test]
    async fn test_version_conflict_maps_to_409() {
        let (status, body) = body_of(AppError::VersionConflict("stale sha".into())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.error, "VERSION_CONFLICT");
    }

    #[tokio::test]
    async fn test_upstream_errors_map_to_502() {
        let (status, body) = body_of(AppError::UpstreamUnavailable("timeout".into())).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.code, 6001);

        let (status, _) = body_of(AppError::UpstreamRejected("422".into())).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_error_response_helper() {
        let response = error_response(
            StatusCode::UNAUTHORIZED,
            "Invalid token".to_string(),
            ErrorCode::Unauthorized,
        );
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
