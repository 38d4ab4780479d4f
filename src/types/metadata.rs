use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use super::ChunkRecord;
use crate::{Result, StorageError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileRecord {
    pub id: Uuid,
    pub file_name: String,
    pub file_size: u64,
    pub original_checksum: String,
    pub created_at: DateTime<Utc>,
    pub chunks: Vec<ChunkRecord>,
}

impl FileRecord {
    /// Chunks sorted by ascending order, independent of how they were stored.
    pub fn ordered_chunks(&self) -> Vec<ChunkRecord> {
        let mut chunks = self.chunks.clone();
        chunks.sort_by_key(|chunk| chunk.order);
        chunks
    }

    /// Checks that chunk orders are dense from zero and that chunk sizes add
    /// up to the recorded file size.
    pub fn validate(&self) -> Result<()> {
        for (expected, chunk) in self.ordered_chunks().iter().enumerate() {
            if chunk.order as usize != expected {
                return Err(StorageError::Integrity {
                    expected: format!("chunk order {} in file {}", expected, self.id),
                    actual: format!("chunk order {}", chunk.order),
                });
            }
            if chunk.file_id != self.id {
                return Err(StorageError::Integrity {
                    expected: format!("chunk {} owned by file {}", chunk.order, self.id),
                    actual: format!("owner {}", chunk.file_id),
                });
            }
        }

        let total_size: u64 = self.chunks.iter().map(|chunk| chunk.size).sum();
        if total_size != self.file_size {
            return Err(StorageError::Integrity {
                expected: format!("{} bytes in file {}", self.file_size, self.id),
                actual: format!("{} bytes across {} chunks", total_size, self.chunks.len()),
            });
        }

        Ok(())
    }
}
