//! API routes module

pub mod auth;
pub mod health;
pub mod images;
pub mod products;

use axum::{Router, middleware};
use axum_helpers::admin_write_guard;

use crate::state::AppState;

/// Create all API routes (nested under `/api` by `create_router`)
///
/// Reads are public; writes to products and images need an admin token.
pub fn routes(state: &AppState) -> Router {
    let catalog = Router::new()
        .nest("/products", products::router(state))
        .nest("/images", images::router(state))
        .layer(middleware::from_fn_with_state(
            state.auth.clone(),
            admin_write_guard,
        ));

    catalog.nest("/auth", auth::router(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum_helpers::AdminConfig;
    use core_config::{app_info, github::GitHubConfig, retry::RetryConfig, server::ServerConfig};
    use domain_products::{InMemoryContents, Product};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn config() -> Config {
        Config {
            app: app_info!(),
            server: ServerConfig::default(),
            environment: Environment::Development,
            github: GitHubConfig::new("acme", "grocery-data", "token"),
            retry: RetryConfig::default(),
            admin: AdminConfig::new("admin", "hunter2", SECRET),
            upload_max_bytes: 1024,
        }
    }

    async fn state() -> (Arc<InMemoryContents>, AppState) {
        let contents = Arc::new(InMemoryContents::new());
        contents.insert("products.json", "[]").await;
        let state = AppState::with_store(config(), contents.clone());
        (contents, state)
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn create_request(token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/products")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder
            .body(Body::from(
                json!({"name": "Oil", "price": 450, "category": "Pantry"}).to_string(),
            ))
            .unwrap()
    }

    async fn login(app: &Router, password: &str) -> axum::response::Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"username": "admin", "password": password}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_reads_are_public() {
        let (_, state) = state().await;
        let app = routes(&state);

        let response = app
            .oneshot(Request::get("/products").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_writes_require_admin_token() {
        let (contents, state) = state().await;
        let app = routes(&state);

        let response = app.oneshot(create_request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(contents.commits().await.is_empty());
    }

    #[tokio::test]
    async fn test_login_then_create() {
        let (contents, state) = state().await;
        let app = routes(&state);

        let response = login(&app, "hunter2").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::SET_COOKIE));
        let token = json_body(response).await["access_token"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app.clone().oneshot(create_request(Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let stored: Vec<Product> =
            serde_json::from_str(&contents.document("products.json").await.unwrap()).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "Oil");

        let response = app
            .oneshot(
                Request::get("/auth/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["sub"], "admin");
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let (_, state) = state().await;
        let app = routes(&state);

        let response = login(&app, "wrong").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_requires_token() {
        let (_, state) = state().await;
        let app = routes(&state);

        let response = app
            .oneshot(Request::get("/auth/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_ready_reflects_document() {
        let (_, state) = state().await;
        let response = health::router(state)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let empty = AppState::with_store(config(), Arc::new(InMemoryContents::new()));
        let response = health::router(empty)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["document"], "unavailable");
    }
}
