//! Image assets committed next to the catalog document.

use chrono::Utc;
use core_config::github::GitHubConfig;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::error::{StoreError, StoreResult};
use crate::models::UploadedImage;
use crate::store::ContentStore;

/// Where assets live in the repository and where they are served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLayout {
    public_base: String,
    asset_prefix: String,
    document_path: String,
}

impl AssetLayout {
    /// `public_base` is the branch root as served publicly, e.g.
    /// `https://raw.githubusercontent.com/owner/repo/main`.
    ///
    /// `document_path` is the catalog document; it is never mapped as an asset.
    pub fn new(
        public_base: impl Into<String>,
        asset_prefix: impl Into<String>,
        document_path: impl Into<String>,
    ) -> Self {
        Self {
            public_base: public_base.into().trim_end_matches('/').to_string(),
            asset_prefix: asset_prefix.into().trim_matches('/').to_string(),
            document_path: document_path.into().trim_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &GitHubConfig) -> Self {
        Self::new(
            config.public_base_url(),
            config.asset_prefix.clone(),
            config.document_path.clone(),
        )
    }

    /// Repository path for an asset file name.
    pub fn path_for_file(&self, file: &str) -> String {
        if self.asset_prefix.is_empty() {
            file.to_string()
        } else {
            format!("{}/{}", self.asset_prefix, file)
        }
    }

    /// Public URL for a repository path.
    pub fn url_for_path(&self, path: &str) -> String {
        format!("{}/{}", self.public_base, path)
    }

    /// Map a stored image URL back to its repository path.
    ///
    /// Only URLs under `{public_base}/{asset_prefix}/` map. Query and fragment
    /// are ignored and the remainder is percent-decoded. `.`/`..` or empty
    /// segments reject the URL, as does a path naming the catalog document.
    pub fn path_for_url(&self, url: &str) -> Option<String> {
        let url = url.trim();
        let url = url.split(['?', '#']).next().unwrap_or_default();

        let managed_root = self.url_for_path(&self.path_for_file(""));
        let relative = url.strip_prefix(&managed_root)?;
        if relative.is_empty() {
            return None;
        }

        let decoded = urlencoding::decode(relative).ok()?;
        let safe = decoded
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
        if !safe || decoded.contains('\\') {
            return None;
        }

        let path = self.path_for_file(&decoded);
        if path == self.document_path {
            return None;
        }
        Some(path)
    }
}

/// Reduce an uploaded file name to `[A-Za-z0-9._-]`.
///
/// Directory components (either separator) are dropped; every other
/// character becomes `-`.
pub fn sanitize_filename(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Uploads and removes image assets in the backing repository.
#[derive(Clone)]
pub struct ImageStore {
    blobs: Arc<dyn ContentStore>,
    layout: AssetLayout,
}

impl ImageStore {
    pub fn new(blobs: Arc<dyn ContentStore>, layout: AssetLayout) -> Self {
        Self { blobs, layout }
    }

    pub fn layout(&self) -> &AssetLayout {
        &self.layout
    }

    /// Commit `bytes` as `{asset_prefix}/{now_ms}-{sanitized name}`.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload(&self, bytes: Vec<u8>, original_name: &str) -> StoreResult<UploadedImage> {
        let file = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_filename(original_name)
        );
        let path = self.layout.path_for_file(&file);

        self.blobs
            .put(&path, bytes, None, &format!("Upload image {}", file))
            .await
            .map_err(|e| StoreError::Upload {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        debug!(path = %path, "Image uploaded");
        Ok(UploadedImage {
            path: format!("/{}", file),
            url: self.layout.url_for_path(&path),
        })
    }

    /// Look up the current version of `path` and delete it.
    #[instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> StoreResult<()> {
        let result = async {
            let file = self.blobs.get(path).await?;
            self.blobs
                .delete(path, file.version, "Delete product image")
                .await
        }
        .await;

        result.map_err(|e| match e {
            StoreError::Delete { .. } => e,
            other => StoreError::Delete {
                path: path.to_string(),
                reason: other.to_string(),
            },
        })
    }
}
