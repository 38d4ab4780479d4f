use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::Mutex;
use tracing::trace;

use super::backend::StorageBackend;
use crate::{ChunkId, Result, StorageError};

/// Read-through LRU cache in front of another backend.
///
/// Writes always go to the inner backend; the cache only ever holds bytes the
/// inner backend has confirmed.
pub struct CachedBackend {
    inner: Arc<dyn StorageBackend>,
    cache: Mutex<LruCache<ChunkId, Vec<u8>>>,
}

impl CachedBackend {
    pub fn new(inner: Arc<dyn StorageBackend>, cache_size: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(cache_size).ok_or_else(|| {
            StorageError::Configuration(format!(
                "cache capacity for backend {} must be positive",
                inner.name()
            ))
        })?;

        Ok(Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        })
    }
}

#[async_trait]
impl StorageBackend for CachedBackend {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn save(&self, chunk_id: &ChunkId, data: &[u8]) -> Result<()> {
        self.inner.save(chunk_id, data).await?;
        let mut cache = self.cache.lock().await;
        cache.put(chunk_id.clone(), data.to_vec());
        Ok(())
    }

    async fn read(&self, chunk_id: &ChunkId) -> Result<Vec<u8>> {
        if let Some(data) = self.cache.lock().await.get(chunk_id).cloned() {
            trace!(backend = %self.name(), %chunk_id, "chunk cache hit");
            return Ok(data);
        }

        let data = self.inner.read(chunk_id).await?;
        let mut cache = self.cache.lock().await;
        cache.put(chunk_id.clone(), data.clone());
        Ok(data)
    }
}
