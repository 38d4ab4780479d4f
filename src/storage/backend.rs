use async_trait::async_trait;

use crate::{ChunkId, Result};

/// A storage medium that persists chunk bytes under their content address.
///
/// `name` must be stable across restarts: chunk records remember it and
/// reconstruction resolves backends by it.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn name(&self) -> &str;
    async fn save(&self, chunk_id: &ChunkId, data: &[u8]) -> Result<()>;
    async fn read(&self, chunk_id: &ChunkId) -> Result<Vec<u8>>;
}
