//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for the Catalog API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Product catalog stored as a JSON document in a GitHub repository",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/products", api = domain_products::ApiDoc),
        (path = "/api/images", api = domain_products::ImagesApiDoc),
        (path = "/api/auth", api = crate::api::auth::AuthApiDoc)
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Images", description = "Product image uploads"),
        (name = "Auth", description = "Admin session endpoints")
    )
)]
pub struct ApiDoc;
