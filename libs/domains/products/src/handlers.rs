//! HTTP handlers for the Products and Images APIs

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_helpers::{
    AppError, IdPath, ValidatedJson,
    errors::{
        ErrorCode, error_response,
        responses::{
            BadGatewayResponse, BadRequestIdResponse, BadRequestValidationResponse,
            ConflictResponse, InternalServerErrorResponse, NotFoundResponse,
            PayloadTooLargeResponse, UnauthorizedResponse,
        },
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::images::ImageStore;
use crate::models::{CreateProduct, ImageUploadForm, Product, UpdateProduct, UploadedImage};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for the Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(Product, CreateProduct, UpdateProduct),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ConflictResponse,
            BadGatewayResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// OpenAPI documentation for the Images API
#[derive(OpenApi)]
#[openapi(
    paths(upload_image),
    components(
        schemas(UploadedImage, ImageUploadForm),
        responses(BadGatewayResponse, PayloadTooLargeResponse, UnauthorizedResponse)
    ),
    tags(
        (name = "Images", description = "Product image uploads")
    )
)]
pub struct ImagesApiDoc;

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// Create the image upload router; bodies above `max_bytes` are rejected with 413.
pub fn images_router(images: ImageStore, max_bytes: usize) -> Router {
    Router::new()
        .route("/", post(upload_image))
        .layer(DefaultBodyLimit::max(max_bytes))
        .with_state(images)
}

/// List all products
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    responses(
        (status = 200, description = "All products in catalog order", body = Vec<Product>),
        (status = 502, response = BadGatewayResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<Vec<Product>>> {
    let products = service.list_products().await?;
    Ok(Json(products))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 409, response = ConflictResponse),
        (status = 502, response = BadGatewayResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 502, response = BadGatewayResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath,
) -> ProductResult<Json<Product>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Update a product; absent fields keep their value
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 502, response = BadGatewayResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<Product>> {
    let product = service.update_product(id, input).await?;
    Ok(Json(product))
}

/// Delete a product and its uploaded image
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted successfully"),
        (status = 400, response = BadRequestIdResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 502, response = BadGatewayResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath,
) -> ProductResult<impl IntoResponse> {
    service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn multipart_rejection(err: MultipartError) -> Response {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(err.body_text()).into_response();
    }
    error_response(
        StatusCode::BAD_REQUEST,
        err.body_text(),
        ErrorCode::MultipartError,
    )
}

/// Upload a product image (multipart field `file`)
#[utoipa::path(
    post,
    path = "",
    tag = "Images",
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image committed", body = UploadedImage),
        (status = 400, description = "No file uploaded"),
        (status = 401, response = UnauthorizedResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 502, response = BadGatewayResponse)
    )
)]
async fn upload_image(
    State(images): State<ImageStore>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadedImage>), Response> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_rejection)? {
        if field.name() != Some("file") {
            continue;
        }

        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_rejection)?;
        let uploaded = images
            .upload(bytes.to_vec(), &name)
            .await
            .map_err(IntoResponse::into_response)?;
        return Ok((StatusCode::CREATED, Json(uploaded)));
    }

    Err(AppError::BadRequest("No file uploaded".to_string()).into_response())
}
