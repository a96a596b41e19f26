use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::error::{ProductError, ProductResult};
use crate::images::ImageStore;
use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::retry::RetryPolicy;
use crate::store::{DocumentStore, VersionToken};

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products in document order
    async fn list(&self) -> ProductResult<Vec<Product>>;

    /// Get a product by ID
    async fn get(&self, id: i64) -> ProductResult<Option<Product>>;

    /// Append a new product with a fresh id
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    /// Shallow-merge `input` into an existing product
    async fn update(&self, id: i64, input: UpdateProduct) -> ProductResult<Product>;

    /// Remove a product and, best effort, its managed image
    async fn delete(&self, id: i64) -> ProductResult<()>;
}

/// Products kept as one JSON array in a versioned document.
///
/// Every mutation is a read, an in-memory change and a conditional write;
/// lost version races are retried under `retry`.
pub struct DocumentProductRepository {
    documents: Arc<dyn DocumentStore>,
    images: ImageStore,
    retry: RetryPolicy,
}

/// `now_ms`, unless an existing product already holds it.
fn next_id(products: &[Product], now_ms: i64) -> i64 {
    if products.iter().any(|p| p.id == now_ms) {
        products.iter().map(|p| p.id).max().map_or(now_ms, |max| max + 1)
    } else {
        now_ms
    }
}

impl DocumentProductRepository {
    pub fn new(documents: Arc<dyn DocumentStore>, images: ImageStore, retry: RetryPolicy) -> Self {
        Self {
            documents,
            images,
            retry,
        }
    }

    async fn load(&self) -> ProductResult<(Vec<Product>, VersionToken)> {
        let document = self.documents.read().await?;
        let products = serde_json::from_str(&document.content)
            .map_err(|e| ProductError::Corrupt(e.to_string()))?;
        Ok((products, document.version))
    }

    async fn save(
        &self,
        products: &[Product],
        version: VersionToken,
        message: &str,
    ) -> ProductResult<()> {
        let content = serde_json::to_string_pretty(products)
            .map_err(|e| ProductError::Corrupt(e.to_string()))?;
        let receipt = self.documents.write(content, version, message).await?;
        debug!(version = %receipt.version, commit_message = message, "Catalog committed");
        Ok(())
    }

    async fn remove_image(&self, product: &Product) {
        if !product.has_image() {
            return;
        }

        let Some(path) = self.images.layout().path_for_url(&product.image) else {
            debug!(image = %product.image, "Image is not managed here, leaving it");
            return;
        };

        if let Err(e) = self.images.delete(&path).await {
            warn!(product_id = product.id, path = %path, error = %e, "Failed to delete product image");
        }
    }
}

#[async_trait]
impl ProductRepository for DocumentProductRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> ProductResult<Vec<Product>> {
        let (products, _) = self.load().await?;
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: i64) -> ProductResult<Option<Product>> {
        let (products, _) = self.load().await?;
        Ok(products.into_iter().find(|p| p.id == id))
    }

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let input = &input;
        self.retry
            .run(|| async move {
                let (mut products, version) = self.load().await?;
                let product = Product::new(
                    next_id(&products, Utc::now().timestamp_millis()),
                    input.clone(),
                );
                products.push(product.clone());
                self.save(&products, version, "Add product").await?;
                Ok(product)
            })
            .await
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: i64, input: UpdateProduct) -> ProductResult<Product> {
        let input = &input;
        self.retry
            .run(|| async move {
                let (mut products, version) = self.load().await?;
                let product = products
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or(ProductError::NotFound(id))?;
                product.apply_update(input.clone());
                let updated = product.clone();
                self.save(&products, version, "Edit product").await?;
                Ok(updated)
            })
            .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> ProductResult<()> {
        let removed = self
            .retry
            .run(|| async move {
                let (mut products, version) = self.load().await?;
                let index = products
                    .iter()
                    .position(|p| p.id == id)
                    .ok_or(ProductError::NotFound(id))?;
                let removed = products.remove(index);
                self.save(&products, version, "Delete product").await?;
                Ok(removed)
            })
            .await?;

        self.remove_image(&removed).await;
        Ok(())
    }
}
