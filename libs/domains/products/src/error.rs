use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

/// Failures of the remote content store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to fetch {path}: {reason}")]
    Fetch { path: String, reason: String },

    #[error("{path} not found")]
    NotFound { path: String },

    #[error("version conflict writing {path}")]
    Conflict { path: String },

    #[error("failed to write {path}: {reason}")]
    Write { path: String, reason: String },

    #[error("failed to upload {path}: {reason}")]
    Upload { path: String, reason: String },

    #[error("failed to delete {path}: {reason}")]
    Delete { path: String, reason: String },

    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product {0} not found")]
    NotFound(i64),

    #[error("Catalog changed concurrently, gave up after {attempts} attempt(s)")]
    Conflict { attempts: u32 },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Catalog document is corrupt: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Fetch { .. } | StoreError::NotFound { .. } => {
                AppError::UpstreamUnavailable(err.to_string())
            }
            StoreError::Conflict { .. } => AppError::VersionConflict(err.to_string()),
            StoreError::Write { .. } | StoreError::Upload { .. } | StoreError::Delete { .. } => {
                AppError::UpstreamRejected(err.to_string())
            }
            StoreError::Decode { .. } => AppError::StorageCorrupt(err.to_string()),
        }
    }
}

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::Conflict { .. } => AppError::VersionConflict(err.to_string()),
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::Corrupt(msg) => AppError::StorageCorrupt(msg),
            ProductError::Store(e) => e.into(),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status_of(err: impl IntoResponse) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_product_errors_map_to_http_status() {
        assert_eq!(status_of(ProductError::NotFound(1)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(ProductError::Conflict { attempts: 3 }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ProductError::Validation("price".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ProductError::Corrupt("not an array".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_errors_map_to_http_status() {
        let path = || "products.json".to_string();
        assert_eq!(
            status_of(StoreError::Fetch { path: path(), reason: "timeout".into() }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(StoreError::Write { path: path(), reason: "422".into() }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(StoreError::Conflict { path: path() }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(StoreError::Decode { path: path(), reason: "bad base64".into() }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
