pub mod address;
pub mod pipeline;
pub mod reconstruct;

use serde::{Deserialize, Serialize};

use crate::{Result, StorageError};

pub const DEFAULT_TARGET_CHUNK_COUNT: u64 = 50;
pub const DEFAULT_MIN_CHUNK_SIZE: usize = 1024 * 1024;
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub target_chunk_count: u64,
    pub min_chunk_size: usize,
    pub max_chunk_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_chunk_count: DEFAULT_TARGET_CHUNK_COUNT,
            min_chunk_size: DEFAULT_MIN_CHUNK_SIZE,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
        }
    }
}

/// Picks a chunk size that splits a file into roughly `target_chunk_count`
/// pieces, bounded by the configured minimum and maximum.
#[derive(Debug, Clone, Copy)]
pub struct ChunkSizer {
    config: ChunkingConfig,
}

impl ChunkSizer {
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        if config.target_chunk_count == 0 {
            return Err(StorageError::Configuration(
                "target_chunk_count must be positive".into(),
            ));
        }
        if config.min_chunk_size == 0 || config.max_chunk_size == 0 {
            return Err(StorageError::Configuration(
                "chunk size limits must be positive".into(),
            ));
        }
        if config.min_chunk_size > config.max_chunk_size {
            return Err(StorageError::Configuration(format!(
                "min_chunk_size {} exceeds max_chunk_size {}",
                config.min_chunk_size, config.max_chunk_size
            )));
        }

        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    pub fn chunk_size(&self, file_size: u64) -> usize {
        let ideal = file_size.div_ceil(self.config.target_chunk_count);
        ideal.clamp(
            self.config.min_chunk_size as u64,
            self.config.max_chunk_size as u64,
        ) as usize
    }
}

impl Default for ChunkSizer {
    fn default() -> Self {
        Self {
            config: ChunkingConfig::default(),
        }
    }
}
