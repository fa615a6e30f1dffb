use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::product::models::Product;
use crate::domain::product::models::NAMESPACE;
use crate::domain::product::ports::ProductCache;
use crate::product::errors::CacheError;

/// Process-local listing cache, used when no Redis URL is configured.
///
/// Entries never expire on their own.
#[derive(Default)]
pub struct InMemoryProductCache {
    entries: RwLock<HashMap<String, Vec<Product>>>,
}

impl InMemoryProductCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductCache for InMemoryProductCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<Product>>, CacheError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, products: &[Product]) -> Result<(), CacheError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), products.to_vec());
        Ok(())
    }

    async fn invalidate_namespace(&self) -> Result<usize, CacheError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(NAMESPACE));
        Ok(before - entries.len())
    }
}
