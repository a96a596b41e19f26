//! Application state management

use axum_helpers::AdminAuth;
use domain_products::{
    AssetLayout, ContentStore, DocumentProductRepository, DocumentStore, GitHubContentsClient,
    ImageStore, ProductService, RemoteDocument, RetryPolicy,
};
use std::sync::Arc;

use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub documents: Arc<dyn DocumentStore>,
    pub images: ImageStore,
    pub auth: AdminAuth,
}

impl AppState {
    /// State backed by the configured GitHub repository.
    pub fn from_config(config: Config) -> eyre::Result<Self> {
        let client = GitHubContentsClient::new(&config.github, config.app.name)?;
        Ok(Self::with_store(config, Arc::new(client)))
    }

    /// State backed by any content store (the in-memory one in tests).
    pub fn with_store(config: Config, store: Arc<dyn ContentStore>) -> Self {
        let documents: Arc<dyn DocumentStore> = Arc::new(RemoteDocument::new(
            store.clone(),
            config.github.document_path.clone(),
        ));
        let images = ImageStore::new(store, AssetLayout::from_config(&config.github));
        let auth = AdminAuth::new(&config.admin);

        Self {
            config,
            documents,
            images,
            auth,
        }
    }

    pub fn product_service(&self) -> ProductService<DocumentProductRepository> {
        let repository = DocumentProductRepository::new(
            self.documents.clone(),
            self.images.clone(),
            RetryPolicy::from(self.config.retry.clone()),
        );
        ProductService::new(repository)
    }
}
