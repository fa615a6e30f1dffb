use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use redis::Client;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::product::models::Description;
use crate::domain::product::models::Price;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::ProductTitle;
use crate::domain::product::models::NAMESPACE;
use crate::domain::product::ports::ProductCache;
use crate::domain::user::models::UserId;
use crate::product::errors::CacheError;

/// Cached representation of a product, stored as a JSON array per key.
#[derive(Debug, Serialize, Deserialize)]
struct ProductEntry {
    id: Uuid,
    title: String,
    description: Option<String>,
    price: f64,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&Product> for ProductEntry {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.0,
            title: product.title.as_str().to_string(),
            description: product
                .description
                .as_ref()
                .map(|d| d.as_str().to_string()),
            price: product.price.value(),
            created_by: product.created_by.0,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl TryFrom<ProductEntry> for Product {
    type Error = CacheError;

    fn try_from(entry: ProductEntry) -> Result<Self, Self::Error> {
        let invalid = |e: String| CacheError::Serialization(e);

        Ok(Product {
            id: ProductId(entry.id),
            title: ProductTitle::new(entry.title).map_err(|e| invalid(e.to_string()))?,
            description: entry
                .description
                .map(Description::new)
                .transpose()
                .map_err(|e| invalid(e.to_string()))?,
            price: Price::new(entry.price).map_err(|e| invalid(e.to_string()))?,
            created_by: UserId(entry.created_by),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        })
    }
}

/// Redis-backed listing cache over a multiplexed connection.
#[derive(Clone)]
pub struct RedisProductCache {
    connection: MultiplexedConnection,
    ttl_seconds: Option<u64>,
}

impl RedisProductCache {
    /// Open a multiplexed connection to `url`.
    ///
    /// # Arguments
    /// * `url` - Redis connection URL
    /// * `ttl_seconds` - Expiry applied to every entry, None to keep entries
    ///   until the next invalidation
    pub async fn connect(url: &str, ttl_seconds: Option<u64>) -> Result<Self, CacheError> {
        let client = Client::open(url).map_err(|e| CacheError::Connection(e.to_string()))?;
        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        tracing::info!(ttl_seconds = ?ttl_seconds, "Connected to Redis product cache");

        Ok(Self {
            connection,
            ttl_seconds,
        })
    }
}

#[async_trait]
impl ProductCache for RedisProductCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<Product>>, CacheError> {
        let mut conn = self.connection.clone();
        let raw: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let entries: Vec<ProductEntry> =
            serde_json::from_str(&raw).map_err(|e| CacheError::Serialization(e.to_string()))?;

        entries
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    async fn set(&self, key: &str, products: &[Product]) -> Result<(), CacheError> {
        let entries: Vec<ProductEntry> = products.iter().map(ProductEntry::from).collect();
        let payload =
            serde_json::to_string(&entries).map_err(|e| CacheError::Serialization(e.to_string()))?;

        let mut conn = self.connection.clone();
        match self.ttl_seconds {
            Some(ttl) => conn.set_ex::<_, _, ()>(key, payload, ttl).await,
            None => conn.set::<_, _, ()>(key, payload).await,
        }
        .map_err(|e| CacheError::Operation(e.to_string()))
    }

    async fn invalidate_namespace(&self) -> Result<usize, CacheError> {
        let mut conn = self.connection.clone();

        // Enumerate then delete; not atomic with concurrent writers
        let keys: Vec<String> = conn
            .keys(format!("{}*", NAMESPACE))
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))?;

        if keys.is_empty() {
            return Ok(0);
        }

        conn.del::<_, ()>(&keys)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))?;

        Ok(keys.len())
    }
}
