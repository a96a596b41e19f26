//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "code": 1005,
        "error": "INTERNAL_ERROR",
        "message": "An internal server error occurred"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "code": 1001,
        "error": "VALIDATION_ERROR",
        "message": "Request validation failed",
        "details": {
            "name": [{
                "code": "length",
                "message": null,
                "params": {"min": 1, "max": 200, "value": ""}
            }]
        }
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "code": 1004,
        "error": "NOT_FOUND",
        "message": "Product 1712345678901 not found"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Unauthorized - Authentication required",
    content_type = "application/json",
    example = json!({
        "code": 1006,
        "error": "UNAUTHORIZED",
        "message": "Authentication required"
    })
)]
pub struct UnauthorizedResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Conflict - the catalog changed between read and write",
    content_type = "application/json",
    example = json!({
        "code": 6003,
        "error": "VERSION_CONFLICT",
        "message": "The catalog changed concurrently, retry the request"
    })
)]
pub struct ConflictResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Gateway - the backing repository failed",
    content_type = "application/json",
    example = json!({
        "code": 6001,
        "error": "UPSTREAM_UNAVAILABLE",
        "message": "GitHub returned 503 for products.json"
    })
)]
pub struct BadGatewayResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Payload Too Large",
    content_type = "application/json",
    example = json!({
        "code": 1012,
        "error": "PAYLOAD_TOO_LARGE",
        "message": "Request body is too large"
    })
)]
pub struct PayloadTooLargeResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid id",
    content_type = "application/json",
    example = json!({
        "code": 1002,
        "error": "INVALID_PATH_PARAMETER",
        "message": "Invalid id: abc"
    })
)]
pub struct BadRequestIdResponse(pub ErrorResponse);
