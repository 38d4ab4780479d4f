use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Content address of a chunk: lowercase hex SHA-256 of its bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ChunkId(pub String);

impl ChunkId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One stored fragment of a file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkRecord {
    pub file_id: Uuid,
    pub chunk_id: ChunkId,
    /// Zero-based position of the fragment within its file.
    pub order: u32,
    pub size: u64,
    pub storage_provider_name: String,
}
