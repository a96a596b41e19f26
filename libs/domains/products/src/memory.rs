//! In-process [`ContentStore`] with content-hash versions.
//!
//! Used by tests and local development in place of a real repository.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::store::{ContentStore, StoredFile, VersionToken};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub path: String,
    pub message: String,
}

#[derive(Default)]
struct State {
    files: BTreeMap<String, StoredFile>,
    commits: Vec<Commit>,
}

#[derive(Default)]
pub struct InMemoryContents {
    state: Mutex<State>,
}

fn version_of(content: &[u8]) -> VersionToken {
    VersionToken::new(format!("{:x}", Sha256::digest(content)))
}

impl InMemoryContents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file without recording a commit.
    pub async fn insert(&self, path: &str, content: impl Into<Vec<u8>>) -> VersionToken {
        let content = content.into();
        let version = version_of(&content);
        self.state.lock().await.files.insert(
            path.to_string(),
            StoredFile {
                content,
                version: version.clone(),
            },
        );
        version
    }

    /// Current text of `path`, if present and UTF-8.
    pub async fn document(&self, path: &str) -> Option<String> {
        let state = self.state.lock().await;
        let file = state.files.get(path)?;
        String::from_utf8(file.content.clone()).ok()
    }

    pub async fn contains(&self, path: &str) -> bool {
        self.state.lock().await.files.contains_key(path)
    }

    /// Commits in the order they landed.
    pub async fn commits(&self) -> Vec<Commit> {
        self.state.lock().await.commits.clone()
    }
}

#[async_trait]
impl ContentStore for InMemoryContents {
    async fn get(&self, path: &str) -> StoreResult<StoredFile> {
        self.state
            .lock()
            .await
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                path: path.to_string(),
            })
    }

    async fn put(
        &self,
        path: &str,
        content: Vec<u8>,
        version: Option<VersionToken>,
        message: &str,
    ) -> StoreResult<VersionToken> {
        let mut state = self.state.lock().await;

        let current = state.files.get(path).map(|file| &file.version);
        if current != version.as_ref() {
            return Err(StoreError::Conflict {
                path: path.to_string(),
            });
        }

        let new_version = version_of(&content);
        state.files.insert(
            path.to_string(),
            StoredFile {
                content,
                version: new_version.clone(),
            },
        );
        state.commits.push(Commit {
            path: path.to_string(),
            message: message.to_string(),
        });

        Ok(new_version)
    }

    async fn delete(&self, path: &str, version: VersionToken, message: &str) -> StoreResult<()> {
        let mut state = self.state.lock().await;

        match state.files.get(path) {
            None => {
                return Err(StoreError::NotFound {
                    path: path.to_string(),
                });
            }
            Some(file) if file.version != version => {
                return Err(StoreError::Conflict {
                    path: path.to_string(),
                });
            }
            Some(_) => {}
        }

        state.files.remove(path);
        state.commits.push(Commit {
            path: path.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}
