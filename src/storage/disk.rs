use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::backend::StorageBackend;
use crate::{ChunkId, Result, StorageError};

/// Stores each chunk as `<chunk_id>.bin` under a base directory.
pub struct FileSystemBackend {
    name: String,
    chunks_path: PathBuf,
}

impl FileSystemBackend {
    pub async fn new<P: AsRef<Path>>(name: impl Into<String>, chunks_path: P) -> Result<Self> {
        let chunks_path = chunks_path.as_ref().to_owned();
        fs::create_dir_all(&chunks_path).await?;

        Ok(Self {
            name: name.into(),
            chunks_path,
        })
    }

    fn get_chunk_path(&self, chunk_id: &ChunkId) -> PathBuf {
        self.chunks_path.join(format!("{}.bin", chunk_id))
    }
}

#[async_trait]
impl StorageBackend for FileSystemBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn save(&self, chunk_id: &ChunkId, data: &[u8]) -> Result<()> {
        let chunk_path = self.get_chunk_path(chunk_id);
        fs::write(&chunk_path, data).await.map_err(|e| {
            StorageError::Backend(format!(
                "{}: failed to write chunk {}: {}",
                self.name, chunk_id, e
            ))
        })?;
        debug!(backend = %self.name, %chunk_id, bytes = data.len(), "chunk written to disk");
        Ok(())
    }

    async fn read(&self, chunk_id: &ChunkId) -> Result<Vec<u8>> {
        let chunk_path = self.get_chunk_path(chunk_id);
        match fs::read(&chunk_path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(format!(
                "chunk {} on backend {}",
                chunk_id, self.name
            ))),
            Err(e) => Err(StorageError::Backend(format!(
                "{}: failed to read chunk {}: {}",
                self.name, chunk_id, e
            ))),
        }
    }
}
