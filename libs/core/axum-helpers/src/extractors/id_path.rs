//! Numeric id path parameter extractor.

use crate::errors::{ErrorCode, error_response};
use axum::{
    extract::{FromRequestParts, Path},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};

/// Extractor for a single `i64` path parameter.
///
/// A non-numeric segment is rejected as `INVALID_PATH_PARAMETER` with a JSON
/// body instead of axum's plain-text rejection.
///
/// ```ignore
/// use axum_helpers::extractors::IdPath;
///
/// async fn get_product(IdPath(id): IdPath) -> String {
///     format!("Product {}", id)
/// }
///
/// let app = Router::new().route("/products/{id}", get(get_product));
/// ```
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        raw.parse::<i64>().map(IdPath).map_err(|_| {
            error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid id: {}", raw),
                ErrorCode::InvalidPathParameter,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorResponse;
    use axum::{Router, body::Body, http::Request, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new().route(
            "/items/{id}",
            get(|IdPath(id): IdPath| async move { id.to_string() }),
        )
    }

    #[tokio::test]
    async fn test_numeric_id_is_extracted() {
        let response = app()
            .oneshot(Request::get("/items/1712345678901").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"1712345678901");
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_rejected() {
        let response = app()
            .oneshot(Request::get("/items/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "INVALID_PATH_PARAMETER");
    }
}
