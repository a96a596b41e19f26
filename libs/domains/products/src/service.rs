//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// Validates input before it reaches the repository and turns a missing
/// product into [`ProductError::NotFound`].
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List all products
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.list().await
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i64) -> ProductResult<Product> {
        self.repository
            .get(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Create a new product
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    /// Update an existing product
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: i64, input: UpdateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository.update(id, input).await
    }

    /// Delete a product
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i64) -> ProductResult<()> {
        self.repository.delete(id).await
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
