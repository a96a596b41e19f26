//! Type-safe error codes for API responses.
//!
//! Each code carries a string identifier for clients, an integer for logs
//! and a default human-readable message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::VersionConflict;
//! assert_eq!(code.as_str(), "VERSION_CONFLICT");
//! assert_eq!(code.code(), 6003);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request validation failed
    ValidationError,

    /// A path parameter could not be parsed
    InvalidPathParameter,

    /// JSON extraction from request body failed
    JsonExtraction,

    /// Requested resource was not found
    NotFound,

    /// An unexpected internal server error occurred
    InternalError,

    /// Authentication credentials are missing or invalid
    Unauthorized,

    /// Authenticated caller lacks sufficient permissions
    Forbidden,

    /// Service is temporarily unavailable
    ServiceUnavailable,

    /// Request body exceeds the configured limit
    PayloadTooLarge,

    /// Multipart form could not be read
    MultipartError,

    // I/O errors (4000s)
    /// File system I/O error
    IoError,

    // JSON errors (5000s)
    /// JSON serialization/deserialization error
    SerdeJsonError,

    // Upstream storage errors (6000s)
    /// The backing repository could not be reached or refused a read
    UpstreamUnavailable,

    /// The backing repository refused a write
    UpstreamRejected,

    /// The stored version changed between read and write
    VersionConflict,

    /// Stored content could not be decoded
    StorageCorrupt,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier for programmatic handling by clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidPathParameter => "INVALID_PATH_PARAMETER",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::MultipartError => "MULTIPART_ERROR",
            Self::IoError => "IO_ERROR",
            Self::SerdeJsonError => "SERDE_JSON_ERROR",
            Self::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            Self::UpstreamRejected => "UPSTREAM_REJECTED",
            Self::VersionConflict => "VERSION_CONFLICT",
            Self::StorageCorrupt => "STORAGE_CORRUPT",
        }
    }

    /// Integer code for structured logs.
    ///
    /// - 1000-1999: client errors
    /// - 4000-4999: I/O errors
    /// - 5000-5999: serialization errors
    /// - 6000-6999: upstream storage errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidPathParameter => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::Unauthorized => 1006,
            Self::Forbidden => 1007,
            Self::ServiceUnavailable => 1011,
            Self::PayloadTooLarge => 1012,
            Self::MultipartError => 1013,

            Self::IoError => 4001,

            Self::SerdeJsonError => 5001,

            Self::UpstreamUnavailable => 6001,
            Self::UpstreamRejected => 6002,
            Self::VersionConflict => 6003,
            Self::StorageCorrupt => 6004,
        }
    }

    /// Default user-facing message; handlers may override it.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidPathParameter => "Invalid path parameter",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::InternalError => "An internal server error occurred",
            Self::Unauthorized => "Authentication required",
            Self::Forbidden => "Access forbidden",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::PayloadTooLarge => "Request body is too large",
            Self::MultipartError => "Invalid multipart form",
            Self::IoError => "I/O error occurred",
            Self::SerdeJsonError => "JSON serialization error",
            Self::UpstreamUnavailable => "Backing store is unavailable",
            Self::UpstreamRejected => "Backing store rejected the write",
            Self::VersionConflict => "The catalog changed concurrently, retry the request",
            Self::StorageCorrupt => "Stored catalog could not be decoded",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_string_representation() {
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::UpstreamUnavailable.as_str(), "UPSTREAM_UNAVAILABLE");
    }

    #[test]
    fn test_error_code_integer_codes() {
        assert_eq!(ErrorCode::ValidationError.code(), 1001);
        assert_eq!(ErrorCode::PayloadTooLarge.code(), 1012);
        assert_eq!(ErrorCode::VersionConflict.code(), 6003);
    }

    #[test]
    fn test_error_code_serde_round_trip() {
        let json = serde_json::to_string(&ErrorCode::VersionConflict).unwrap();
        assert_eq!(json, "\"VERSION_CONFLICT\"");
        let code: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, ErrorCode::VersionConflict);
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::StorageCorrupt.to_string(), "STORAGE_CORRUPT");
    }
}
