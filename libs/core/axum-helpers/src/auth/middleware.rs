use super::jwt::{AdminAuth, SessionClaims};
use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Extract the token from `Authorization: Bearer` or the `access_token` cookie.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .or_else(|| {
            headers
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .and_then(|cookies| {
                    cookies.split(';').find_map(|cookie| {
                        let (name, value) = cookie.trim().split_once('=')?;
                        (name == "access_token").then(|| value.to_string())
                    })
                })
        })
        .filter(|token| !token.is_empty())
}

fn authenticate(auth: &AdminAuth, headers: &HeaderMap) -> Result<SessionClaims, AppError> {
    let token = extract_token(headers).ok_or_else(|| {
        tracing::debug!("No admin token in Authorization header or cookie");
        AppError::Unauthorized("Authentication required".to_string())
    })?;

    let claims = auth.verify_token(&token).map_err(|e| {
        tracing::debug!("Admin token verification failed: {}", e);
        AppError::Unauthorized("Invalid or expired token".to_string())
    })?;

    if !claims.is_admin() {
        return Err(AppError::Forbidden("Admin role required".to_string()));
    }
    Ok(claims)
}

/// Require a valid admin token on every request.
///
/// Inserts [`SessionClaims`] into the request extensions on success.
pub async fn require_admin(
    State(auth): State<AdminAuth>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&auth, request.headers()) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Let safe methods (GET, HEAD, OPTIONS, TRACE) through and require an admin
/// token for everything else.
pub async fn admin_write_guard(
    State(auth): State<AdminAuth>,
    request: Request,
    next: Next,
) -> Response {
    if request.method().is_safe() {
        return next.run(request).await;
    }
    require_admin(State(auth), request, next).await
}

/// Extractor for the session attached by [`require_admin`].
pub struct AdminSession(pub SessionClaims);

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionClaims>()
            .cloned()
            .map(AdminSession)
            .ok_or_else(|| {
                AppError::Unauthorized("Authentication required".to_string()).into_response()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AdminConfig;
    use axum::{
        Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
    };
    use tower::ServiceExt;

    fn auth() -> AdminAuth {
        AdminAuth::new(&AdminConfig::new(
            "admin",
            "hunter2",
            "this-is-a-valid-secret-with-32-chars!",
        ))
    }

    fn app(auth: AdminAuth) -> Router {
        Router::new()
            .route(
                "/",
                get(|| async { "read" }).post(|AdminSession(claims): AdminSession| async move {
                    claims.sub
                }),
            )
            .layer(from_fn_with_state(auth, admin_write_guard))
    }

    #[test]
    fn test_extract_token_prefers_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer abc".parse().unwrap());
        headers.insert(header::COOKIE, "access_token=xyz".parse().unwrap());
        assert_eq!(extract_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "theme=dark; access_token=xyz".parse().unwrap());
        assert_eq!(extract_token(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_extract_token_missing() {
        assert!(extract_token(&HeaderMap::new()).is_none());
    }

    #[tokio::test]
    async fn test_safe_methods_pass_without_token() {
        let response = app(auth())
            .oneshot(HttpRequest::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_writes_require_token() {
        let response = app(auth())
            .oneshot(HttpRequest::post("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_writes_pass_with_valid_token() {
        let auth = auth();
        let token = auth.issue_token("admin").unwrap();
        let response = app(auth)
            .oneshot(
                HttpRequest::post("/")
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
