//! Versioned storage seams.
//!
//! [`ContentStore`] is a path-addressed blob store whose writes are
//! conditioned on a [`VersionToken`]. [`DocumentStore`] narrows it to the
//! single text document holding the catalog.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::error::{StoreError, StoreResult};

/// Opaque version of a stored file (the blob sha on GitHub).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionToken(String);

impl VersionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub content: Vec<u8>,
    pub version: VersionToken,
}

/// Path-addressed store with compare-and-swap writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Read a file and its current version.
    async fn get(&self, path: &str) -> StoreResult<StoredFile>;

    /// Create (`version = None`) or replace a file. A stale or missing
    /// version on an existing file fails with [`StoreError::Conflict`].
    async fn put(
        &self,
        path: &str,
        content: Vec<u8>,
        version: Option<VersionToken>,
        message: &str,
    ) -> StoreResult<VersionToken>;

    /// Remove a file at the given version.
    async fn delete(&self, path: &str, version: VersionToken, message: &str) -> StoreResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedDocument {
    pub content: String,
    pub version: VersionToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReceipt {
    pub version: VersionToken,
}

/// The catalog document: read with its version, write conditioned on it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn read(&self) -> StoreResult<VersionedDocument>;

    /// Single compare-and-swap; no retry at this layer.
    async fn write(
        &self,
        content: String,
        version: VersionToken,
        message: &str,
    ) -> StoreResult<WriteReceipt>;
}

/// A [`DocumentStore`] backed by one UTF-8 file of a [`ContentStore`].
#[derive(Clone)]
pub struct RemoteDocument {
    store: Arc<dyn ContentStore>,
    path: String,
}

impl RemoteDocument {
    pub fn new(store: Arc<dyn ContentStore>, path: impl Into<String>) -> Self {
        Self {
            store,
            path: path.into(),
        }
    }
}

#[async_trait]
impl DocumentStore for RemoteDocument {
    async fn read(&self) -> StoreResult<VersionedDocument> {
        let file = self.store.get(&self.path).await?;
        let content = String::from_utf8(file.content).map_err(|e| StoreError::Decode {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        Ok(VersionedDocument {
            content,
            version: file.version,
        })
    }

    async fn write(
        &self,
        content: String,
        version: VersionToken,
        message: &str,
    ) -> StoreResult<WriteReceipt> {
        let version = self
            .store
            .put(&self.path, content.into_bytes(), Some(version), message)
            .await?;
        Ok(WriteReceipt { version })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_decodes_utf8() {
        let mut store = MockContentStore::new();
        store
            .expect_get()
            .withf(|path| path == "products.json")
            .times(1)
            .returning(|_| {
                Ok(StoredFile {
                    content: b"[]".to_vec(),
                    version: VersionToken::new("abc"),
                })
            });

        let document = RemoteDocument::new(Arc::new(store), "products.json");
        let read = document.read().await.unwrap();

        assert_eq!(read.content, "[]");
        assert_eq!(read.version.as_str(), "abc");
    }

    #[tokio::test]
    async fn test_read_rejects_invalid_utf8() {
        let mut store = MockContentStore::new();
        store.expect_get().returning(|_| {
            Ok(StoredFile {
                content: vec![0xff, 0xfe],
                version: VersionToken::new("abc"),
            })
        });

        let document = RemoteDocument::new(Arc::new(store), "products.json");
        let err = document.read().await.unwrap_err();

        assert!(matches!(err, StoreError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_write_passes_version_through() {
        let mut store = MockContentStore::new();
        store
            .expect_put()
            .withf(|path, content, version, message| {
                path == "products.json"
                    && content == b"[]"
                    && version.as_ref().map(VersionToken::as_str) == Some("abc")
                    && message == "Add product"
            })
            .times(1)
            .returning(|_, _, _, _| Ok(VersionToken::new("def")));

        let document = RemoteDocument::new(Arc::new(store), "products.json");
        let receipt = document
            .write("[]".to_string(), VersionToken::new("abc"), "Add product")
            .await
            .unwrap();

        assert_eq!(receipt.version.as_str(), "def");
    }
}
