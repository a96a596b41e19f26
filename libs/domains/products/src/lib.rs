//! Products Domain
//!
//! A product catalog persisted as one JSON document in a GitHub repository,
//! with product images committed next to it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints (products, image upload)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Read, modify, conditional write, conflict retry
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌─────────────┐
//! │DocumentStore│     │ ImageStore  │
//! └──────┬──────┘     └──────┬──────┘
//!        └─────────┬─────────┘
//!           ┌──────▼──────┐
//!           │ContentStore │  ← GitHub contents API (or in-memory)
//!           └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{
//!     AssetLayout, DocumentProductRepository, GitHubContentsClient, ImageStore,
//!     ProductService, RemoteDocument, RetryPolicy, handlers,
//! };
//! use core_config::github::GitHubConfig;
//! use std::sync::Arc;
//!
//! # fn example() -> eyre::Result<()> {
//! let config = GitHubConfig::new("acme", "grocery-data", "token");
//! let client = Arc::new(GitHubContentsClient::new(&config, "catalog")?);
//!
//! let images = ImageStore::new(client.clone(), AssetLayout::from_config(&config));
//! let documents = Arc::new(RemoteDocument::new(client, config.document_path.clone()));
//! let repository = DocumentProductRepository::new(documents, images, RetryPolicy::default());
//!
//! let router = handlers::router(ProductService::new(repository));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod github;
pub mod handlers;
pub mod images;
pub mod memory;
pub mod models;
pub mod repository;
pub mod retry;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use error::{ProductError, ProductResult, StoreError, StoreResult};
pub use github::GitHubContentsClient;
pub use handlers::{ApiDoc, ImagesApiDoc};
pub use images::{AssetLayout, ImageStore, sanitize_filename};
pub use memory::InMemoryContents;
pub use models::{CreateProduct, Product, UpdateProduct, UploadedImage};
pub use repository::{DocumentProductRepository, ProductRepository};
pub use retry::RetryPolicy;
pub use service::ProductService;
pub use store::{
    ContentStore, DocumentStore, RemoteDocument, StoredFile, VersionToken, VersionedDocument,
    WriteReceipt,
};
