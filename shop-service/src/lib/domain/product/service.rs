use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::models::UserId;
use crate::product::errors::ProductError;
use crate::product::models::CreateProductCommand;
use crate::product::models::Product;
use crate::product::models::ProductId;
use crate::product::models::ProductQuery;
use crate::product::models::UpdateProductCommand;
use crate::product::ports::ProductCache;
use crate::product::ports::ProductRepository;
use crate::product::ports::ProductServicePort;

/// Product catalogue with a read-through listing cache.
///
/// Listings are looked up in the cache first and written back on a miss.
/// Every successful mutation drops the whole product namespace before
/// returning, so a completed write is never followed by a stale listing.
/// A failing cache is logged and otherwise ignored.
pub struct ProductService<PR, PC>
where
    PR: ProductRepository,
    PC: ProductCache + ?Sized,
{
    repository: Arc<PR>,
    cache: Arc<PC>,
}

impl<PR, PC> ProductService<PR, PC>
where
    PR: ProductRepository,
    PC: ProductCache + ?Sized,
{
    pub fn new(repository: Arc<PR>, cache: Arc<PC>) -> Self {
        Self { repository, cache }
    }

    async fn invalidate(&self) {
        match self.cache.invalidate_namespace().await {
            Ok(removed) => tracing::debug!(removed, "Product cache invalidated"),
            Err(e) => tracing::error!(error = %e, "Failed to invalidate product cache"),
        }
    }

    async fn find(&self, id: &ProductId) -> Result<Product, ProductError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl<PR, PC> ProductServicePort for ProductService<PR, PC>
where
    PR: ProductRepository,
    PC: ProductCache + ?Sized,
{
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ProductError> {
        let scope = query.scope();
        let key = scope.cache_key();

        match self.cache.get(&key).await {
            Ok(Some(products)) => {
                tracing::debug!(key = %key, "Product cache hit");
                return Ok(products);
            }
            Ok(None) => tracing::debug!(key = %key, "Product cache miss"),
            Err(e) => tracing::warn!(key = %key, error = %e, "Product cache read failed"),
        }

        let products = self.repository.search(&scope).await?;

        if let Err(e) = self.cache.set(&key, &products).await {
            tracing::warn!(key = %key, error = %e, "Product cache write failed");
        }

        Ok(products)
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, ProductError> {
        self.find(id).await
    }

    async fn create_product(
        &self,
        command: CreateProductCommand,
        creator: &UserId,
    ) -> Result<Product, ProductError> {
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(),
            title: command.title,
            description: command.description,
            price: command.price,
            created_by: *creator,
            created_at: now,
            updated_at: now,
        };

        let product = self.repository.create(product).await?;
        tracing::info!(product_id = %product.id, created_by = %creator, "Product created");

        self.invalidate().await;
        Ok(product)
    }

    async fn update_product(
        &self,
        id: &ProductId,
        command: UpdateProductCommand,
    ) -> Result<Product, ProductError> {
        let mut product = self.find(id).await?;

        if let Some(title) = command.title {
            product.title = title;
        }
        if let Some(description) = command.description {
            product.description = Some(description);
        }
        if let Some(price) = command.price {
            product.price = price;
        }
        product.updated_at = Utc::now();

        let product = self.repository.update(product).await?;
        tracing::info!(product_id = %product.id, "Product updated");

        self.invalidate().await;
        Ok(product)
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), ProductError> {
        self.repository.delete(id).await?;
        tracing::info!(product_id = %id, "Product deleted");

        self.invalidate().await;
        Ok(())
    }
}
