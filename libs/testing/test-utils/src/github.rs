//! In-process stand-in for the GitHub contents API.
//!
//! Serves `GET`/`PUT`/`DELETE /repos/{owner}/{repo}/contents/{path}` on an
//! ephemeral localhost port with the same sha rules GitHub applies: writes to
//! an existing file need its current sha (409 on mismatch, 422 when missing),
//! and missing files are 404.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;

/// One request as the fake received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub git_ref: Option<String>,
    pub branch: Option<String>,
    pub message: Option<String>,
    pub headers: HeaderMap,
}

#[derive(Default)]
struct FakeState {
    files: BTreeMap<String, (Vec<u8>, String)>,
    requests: Vec<RecordedRequest>,
    fail_next: Option<StatusCode>,
}

type Shared = Arc<Mutex<FakeState>>;

fn lock(state: &Shared) -> MutexGuard<'_, FakeState> {
    state.lock().expect("fake GitHub state poisoned")
}

fn blob_sha(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("blob {}\0", content.len()).as_bytes());
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// GitHub wraps base64 payloads at 60 columns.
fn wrapped_base64(content: &[u8]) -> String {
    let encoded = STANDARD.encode(content);
    let mut out = String::with_capacity(encoded.len() + encoded.len() / 60 + 1);
    for chunk in encoded.as_bytes().chunks(60) {
        out.push_str(&String::from_utf8_lossy(chunk));
        out.push('\n');
    }
    out
}

fn github_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

#[derive(Deserialize)]
struct RefQuery {
    #[serde(rename = "ref")]
    git_ref: Option<String>,
}

#[derive(Deserialize)]
struct PutBody {
    message: String,
    content: String,
    sha: Option<String>,
    branch: Option<String>,
}

#[derive(Deserialize)]
struct DeleteBody {
    message: String,
    sha: String,
    branch: Option<String>,
}

/// Shared prelude: record the request, enforce auth, honour `fail_next`.
fn admit(
    state: &mut FakeState,
    request: RecordedRequest,
) -> Result<(), Response> {
    let authorized = request
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer "));
    state.requests.push(request);

    if let Some(status) = state.fail_next.take() {
        return Err(github_error(status, "Injected failure"));
    }
    if !authorized {
        return Err(github_error(StatusCode::UNAUTHORIZED, "Bad credentials"));
    }
    Ok(())
}

async fn get_contents(
    State(state): State<Shared>,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
    Query(query): Query<RefQuery>,
    headers: HeaderMap,
) -> Response {
    let mut state = lock(&state);
    let recorded = RecordedRequest {
        method: Method::GET,
        path: path.clone(),
        git_ref: query.git_ref,
        branch: None,
        message: None,
        headers,
    };
    if let Err(response) = admit(&mut state, recorded) {
        return response;
    }

    match state.files.get(&path) {
        Some((content, sha)) => Json(json!({
            "type": "file",
            "encoding": "base64",
            "path": path,
            "sha": sha,
            "size": content.len(),
            "content": wrapped_base64(content),
        }))
        .into_response(),
        None => github_error(StatusCode::NOT_FOUND, "Not Found"),
    }
}

async fn put_contents(
    State(state): State<Shared>,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<PutBody>,
) -> Response {
    let mut state = lock(&state);
    let recorded = RecordedRequest {
        method: Method::PUT,
        path: path.clone(),
        git_ref: None,
        branch: body.branch.clone(),
        message: Some(body.message.clone()),
        headers,
    };
    if let Err(response) = admit(&mut state, recorded) {
        return response;
    }

    let current = state.files.get(&path).map(|(_, sha)| sha.clone());
    match (current, body.sha) {
        (Some(_), None) => {
            return github_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Invalid request.\n\n\"sha\" wasn't supplied.",
            );
        }
        (Some(current), Some(given)) if current != given => {
            return github_error(
                StatusCode::CONFLICT,
                &format!("{} does not match {}", path, given),
            );
        }
        (None, Some(_)) => {
            return github_error(StatusCode::CONFLICT, &format!("{} does not exist", path));
        }
        _ => {}
    }

    let Ok(content) = STANDARD.decode(body.content.as_bytes()) else {
        return github_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "content is not valid Base64",
        );
    };

    let created = !state.files.contains_key(&path);
    let sha = blob_sha(&content);
    state.files.insert(path.clone(), (content, sha.clone()));

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (
        status,
        Json(json!({
            "content": { "path": path, "sha": sha },
            "commit": { "sha": blob_sha(body.message.as_bytes()), "message": body.message },
        })),
    )
        .into_response()
}

async fn delete_contents(
    State(state): State<Shared>,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<DeleteBody>,
) -> Response {
    let mut state = lock(&state);
    let recorded = RecordedRequest {
        method: Method::DELETE,
        path: path.clone(),
        git_ref: None,
        branch: body.branch.clone(),
        message: Some(body.message.clone()),
        headers,
    };
    if let Err(response) = admit(&mut state, recorded) {
        return response;
    }

    match state.files.get(&path) {
        None => github_error(StatusCode::NOT_FOUND, "Not Found"),
        Some((_, sha)) if *sha != body.sha => github_error(
            StatusCode::CONFLICT,
            &format!("{} does not match {}", path, body.sha),
        ),
        Some(_) => {
            state.files.remove(&path);
            Json(json!({
                "content": null,
                "commit": { "sha": blob_sha(body.message.as_bytes()), "message": body.message },
            }))
            .into_response()
        }
    }
}

/// A running fake GitHub server; stopped on drop.
///
/// ```rust,ignore
/// let github = FakeGitHub::start().await;
/// github.seed("products.json", "[]");
///
/// let mut config = GitHubConfig::new("acme", "catalog", "token");
/// config.api_url = github.api_url();
/// ```
pub struct FakeGitHub {
    api_url: String,
    state: Shared,
    server: JoinHandle<()>,
}

impl FakeGitHub {
    pub async fn start() -> Self {
        let state: Shared = Arc::default();

        let app = Router::new()
            .route(
                "/repos/{owner}/{repo}/contents/{*path}",
                get(get_contents).put(put_contents).delete(delete_contents),
            )
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake GitHub listener");
        let addr = listener
            .local_addr()
            .expect("Failed to read fake GitHub address");

        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Fake GitHub server failed");
        });

        tracing::debug!(%addr, "Fake GitHub ready");

        Self {
            api_url: format!("http://{}", addr),
            state,
            server,
        }
    }

    /// Base URL to use in place of `https://api.github.com`.
    pub fn api_url(&self) -> String {
        self.api_url.clone()
    }

    /// Put a file in place without recording a request; returns its sha.
    pub fn seed(&self, path: &str, content: impl Into<Vec<u8>>) -> String {
        let content = content.into();
        let sha = blob_sha(&content);
        lock(&self.state)
            .files
            .insert(path.to_string(), (content, sha.clone()));
        sha
    }

    /// Replace a file as another writer would, moving its sha.
    pub fn overwrite(&self, path: &str, content: impl Into<Vec<u8>>) -> String {
        self.seed(path, content)
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        lock(&self.state).files.get(path).map(|(content, _)| content.clone())
    }

    pub fn file_text(&self, path: &str) -> Option<String> {
        self.file(path)
            .map(|bytes| String::from_utf8(bytes).expect("fake GitHub file is not UTF-8"))
    }

    pub fn sha(&self, path: &str) -> Option<String> {
        lock(&self.state).files.get(path).map(|(_, sha)| sha.clone())
    }

    pub fn paths(&self) -> Vec<String> {
        lock(&self.state).files.keys().cloned().collect()
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    /// Count of requests per method.
    pub fn request_counts(&self) -> HashMap<Method, usize> {
        let mut counts = HashMap::new();
        for request in lock(&self.state).requests.iter() {
            *counts.entry(request.method.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Answer the next request with `status` regardless of its content.
    pub fn fail_next(&self, status: StatusCode) {
        lock(&self.state).fail_next = Some(status);
    }
}

impl Drop for FakeGitHub {
    fn drop(&mut self) {
        self.server.abort();
    }
}
