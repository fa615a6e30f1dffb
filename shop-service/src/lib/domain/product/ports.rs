use async_trait::async_trait;

use crate::domain::user::models::UserId;
use crate::product::errors::CacheError;
use crate::product::errors::ProductError;
use crate::product::models::CreateProductCommand;
use crate::product::models::Product;
use crate::product::models::ProductId;
use crate::product::models::ProductQuery;
use crate::product::models::ProductScope;
use crate::product::models::UpdateProductCommand;

/// Port for the product catalogue.
#[async_trait]
pub trait ProductServicePort: Send + Sync + 'static {
    /// List products matching the query, served from the cache when possible.
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ProductError>;

    /// Retrieve a product by identifier, bypassing the cache.
    ///
    /// # Errors
    /// * `NotFound` - Product does not exist
    async fn get_product(&self, id: &ProductId) -> Result<Product, ProductError>;

    /// Add a product on behalf of `creator`.
    ///
    /// # Errors
    /// * `CreatorNotFound` - Creator account no longer exists
    async fn create_product(
        &self,
        command: CreateProductCommand,
        creator: &UserId,
    ) -> Result<Product, ProductError>;

    /// # Errors
    /// * `NotFound` - Product does not exist
    async fn update_product(
        &self,
        id: &ProductId,
        command: UpdateProductCommand,
    ) -> Result<Product, ProductError>;

    /// # Errors
    /// * `NotFound` - Product does not exist
    async fn delete_product(&self, id: &ProductId) -> Result<(), ProductError>;
}

/// Persistence operations for the product aggregate.
#[async_trait]
pub trait ProductRepository: Send + Sync + 'static {
    async fn create(&self, product: Product) -> Result<Product, ProductError>;

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError>;

    /// Products matching the scope: case-insensitive title substring and
    /// inclusive price range, each only when present.
    async fn search(&self, scope: &ProductScope) -> Result<Vec<Product>, ProductError>;

    /// # Errors
    /// * `NotFound` - Product does not exist
    async fn update(&self, product: Product) -> Result<Product, ProductError>;

    /// # Errors
    /// * `NotFound` - Product does not exist
    async fn delete(&self, id: &ProductId) -> Result<(), ProductError>;
}

/// Key-value store holding product listings.
#[async_trait]
pub trait ProductCache: Send + Sync + 'static {
    /// Cached listing under `key`, None on a miss.
    async fn get(&self, key: &str) -> Result<Option<Vec<Product>>, CacheError>;

    async fn set(&self, key: &str, products: &[Product]) -> Result<(), CacheError>;

    /// Drop every listing in the product namespace.
    ///
    /// # Returns
    /// Number of entries removed
    async fn invalidate_namespace(&self) -> Result<usize, CacheError>;
}
