//! GitHub contents API client.
//!
//! Files travel base64-encoded inside a JSON envelope; writes and deletes
//! carry the blob sha they expect to replace.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use core_config::github::GitHubConfig;
use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::{ContentStore, StoredFile, VersionToken};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

#[derive(Debug, Deserialize)]
struct ContentsEnvelope {
    sha: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    branch: &'a str,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    content: PutContent,
}

#[derive(Debug, Deserialize)]
struct PutContent {
    sha: String,
}

#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    message: &'a str,
    sha: &'a str,
    branch: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GitHubErrorBody {
    #[serde(default)]
    message: String,
}

/// [`ContentStore`] over `/repos/{owner}/{repo}/contents/{path}` on one branch.
#[derive(Clone)]
pub struct GitHubContentsClient {
    client: Client,
    api_url: String,
    owner: String,
    repo: String,
    branch: String,
}

impl GitHubContentsClient {
    /// Build a client that sends the bearer token, API version and
    /// `user_agent` on every request.
    pub fn new(config: &GitHubConfig, user_agent: &str) -> eyre::Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            branch: config.branch.clone(),
        })
    }

    fn contents_url(&self, path: &str) -> String {
        let encoded = path
            .trim_matches('/')
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url, self.owner, self.repo, encoded
        )
    }
}

/// Best-effort `message` from a GitHub error body.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.json::<GitHubErrorBody>().await.unwrap_or_default();
    if body.message.is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, body.message)
    }
}

fn decode_content(path: &str, envelope: ContentsEnvelope) -> StoreResult<StoredFile> {
    let decode_error = |reason: String| StoreError::Decode {
        path: path.to_string(),
        reason,
    };

    match envelope.encoding.as_deref() {
        None | Some("base64") => {}
        Some(other) => return Err(decode_error(format!("unsupported encoding '{}'", other))),
    }

    // GitHub wraps the base64 payload at 60 columns.
    let compact: String = envelope
        .content
        .ok_or_else(|| decode_error("envelope has no content".to_string()))?
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let content = STANDARD
        .decode(compact)
        .map_err(|e| decode_error(e.to_string()))?;

    Ok(StoredFile {
        content,
        version: VersionToken::new(envelope.sha),
    })
}

#[async_trait]
impl ContentStore for GitHubContentsClient {
    async fn get(&self, path: &str) -> StoreResult<StoredFile> {
        let fetch_error = |reason: String| StoreError::Fetch {
            path: path.to_string(),
            reason,
        };

        let response = self
            .client
            .get(self.contents_url(path))
            .query(&[("ref", self.branch.as_str())])
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        debug!(method = "GET", path, status = status.as_u16(), "GitHub contents");

        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            return Err(fetch_error(error_message(response).await));
        }

        let envelope: ContentsEnvelope = response.json().await.map_err(|e| StoreError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        decode_content(path, envelope)
    }

    async fn put(
        &self,
        path: &str,
        content: Vec<u8>,
        version: Option<VersionToken>,
        message: &str,
    ) -> StoreResult<VersionToken> {
        let write_error = |reason: String| StoreError::Write {
            path: path.to_string(),
            reason,
        };

        let body = PutRequest {
            message,
            content: STANDARD.encode(content),
            sha: version.as_ref().map(VersionToken::as_str),
            branch: &self.branch,
        };

        let response = self
            .client
            .put(self.contents_url(path))
            .json(&body)
            .send()
            .await
            .map_err(|e| write_error(e.to_string()))?;

        let status = response.status();
        debug!(method = "PUT", path, status = status.as_u16(), "GitHub contents");

        if status == StatusCode::CONFLICT {
            return Err(StoreError::Conflict {
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            let reason = error_message(response).await;
            // Creating over an existing file without a sha is reported as 422.
            if status == StatusCode::UNPROCESSABLE_ENTITY && reason.contains("sha") {
                return Err(StoreError::Conflict {
                    path: path.to_string(),
                });
            }
            return Err(write_error(reason));
        }

        let receipt: PutResponse = response
            .json()
            .await
            .map_err(|e| write_error(format!("unreadable response: {}", e)))?;

        Ok(VersionToken::new(receipt.content.sha))
    }

    async fn delete(&self, path: &str, version: VersionToken, message: &str) -> StoreResult<()> {
        let delete_error = |reason: String| StoreError::Delete {
            path: path.to_string(),
            reason,
        };

        let body = DeleteRequest {
            message,
            sha: version.as_str(),
            branch: &self.branch,
        };

        let response = self
            .client
            .delete(self.contents_url(path))
            .json(&body)
            .send()
            .await
            .map_err(|e| delete_error(e.to_string()))?;

        let status = response.status();
        debug!(method = "DELETE", path, status = status.as_u16(), "GitHub contents");

        match status {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(StoreError::NotFound {
                path: path.to_string(),
            }),
            StatusCode::CONFLICT => Err(StoreError::Conflict {
                path: path.to_string(),
            }),
            _ => Err(delete_error(error_message(response).await)),
        }
    }
}
