//! JSON extractor with automatic validation using the validator crate.

use crate::errors::{AppError, ErrorCode, ErrorResponse};
use axum::{
    extract::{FromRequest, Json, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// JSON extractor with automatic validation.
///
/// Malformed bodies are rejected as `JSON_EXTRACTION`; bodies that parse but
/// fail their `Validate` rules are rejected with 400 and per-field details.
///
/// ```ignore
/// use axum_helpers::ValidatedJson;
///
/// async fn create(ValidatedJson(input): ValidatedJson<CreateProduct>) -> String {
///     input.name
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        data.validate().map_err(|e| validation_response(&e))?;

        Ok(ValidatedJson(data))
    }
}

fn validation_response(errors: &ValidationErrors) -> Response {
    let details = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages: Vec<serde_json::Value> = errors
                .iter()
                .map(|err| {
                    serde_json::json!({
                        "code": err.code,
                        "message": err.message,
                        "params": err.params,
                    })
                })
                .collect();
            (field.to_string(), serde_json::Value::Array(messages))
        })
        .collect::<serde_json::Map<_, _>>();

    let body = ErrorResponse::new(
        ErrorCode::ValidationError,
        ErrorCode::ValidationError.default_message(),
    )
    .with_details(serde_json::Value::Object(details));

    (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
}
