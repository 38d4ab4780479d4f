use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::backend::StorageBackend;
use crate::{ChunkId, Result, StorageError};

/// Key-value backend held in process memory.
pub struct MemoryBackend {
    name: String,
    chunks: Mutex<HashMap<ChunkId, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chunks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.chunks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.chunks.lock().await.is_empty()
    }

    pub async fn contains(&self, chunk_id: &ChunkId) -> bool {
        self.chunks.lock().await.contains_key(chunk_id)
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn save(&self, chunk_id: &ChunkId, data: &[u8]) -> Result<()> {
        let mut chunks = self.chunks.lock().await;
        chunks.insert(chunk_id.clone(), data.to_vec());
        Ok(())
    }

    async fn read(&self, chunk_id: &ChunkId) -> Result<Vec<u8>> {
        let chunks = self.chunks.lock().await;
        chunks.get(chunk_id).cloned().ok_or_else(|| {
            StorageError::NotFound(format!("chunk {} on backend {}", chunk_id, self.name))
        })
    }
}
