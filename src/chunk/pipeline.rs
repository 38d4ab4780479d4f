use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tokio::fs::{self, File};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};
use uuid::Uuid;

use super::address::{address_of, checksum_of};
use super::ChunkSizer;
use crate::storage::metadata::MetadataStore;
use crate::storage::router::PlacementRouter;
use crate::{ChunkRecord, FileRecord, Result, StorageError};

/// Splits a file into ordered windows, stores each window on the backend its
/// position maps to, and records the file once every window is stored.
pub struct ChunkingPipeline {
    sizer: ChunkSizer,
    router: Arc<PlacementRouter>,
    metadata: Arc<dyn MetadataStore>,
}

impl ChunkingPipeline {
    pub fn new(
        sizer: ChunkSizer,
        router: Arc<PlacementRouter>,
        metadata: Arc<dyn MetadataStore>,
    ) -> Self {
        Self {
            sizer,
            router,
            metadata,
        }
    }

    /// Stores the file and returns its chunk records in ascending order.
    pub async fn chunk_and_store<P: AsRef<Path>>(&self, path: P) -> Result<Vec<ChunkRecord>> {
        let file = self.store_file(path).await?;
        Ok(file.chunks)
    }

    /// Stores the file and returns the full record that was persisted.
    ///
    /// Chunks are saved one at a time. If any save fails the operation stops
    /// and nothing is recorded; chunks saved before the failure stay on their
    /// backends unreferenced.
    pub async fn store_file<P: AsRef<Path>>(&self, path: P) -> Result<FileRecord> {
        let path = path.as_ref();
        let unreadable = |e: std::io::Error| {
            StorageError::NotFound(format!("source file {}: {}", path.display(), e))
        };

        let source_metadata = fs::metadata(path).await.map_err(unreadable)?;
        if !source_metadata.is_file() {
            return Err(StorageError::NotFound(format!(
                "source file {}: not a regular file",
                path.display()
            )));
        }

        let expected_size = source_metadata.len();
        let chunk_size = self.sizer.chunk_size(expected_size);
        let file_id = Uuid::new_v4();
        info!(%file_id, path = %path.display(), size = expected_size, chunk_size, "chunking file");

        let mut source = File::open(path).await.map_err(unreadable)?;
        let mut buffer = vec![0u8; chunk_size];
        let mut chunks = Vec::new();
        let mut order: u32 = 0;
        let mut total_size: u64 = 0;

        loop {
            let read = read_window(&mut source, &mut buffer).await?;
            if read == 0 {
                break;
            }
            let window = &buffer[..read];

            let chunk_id = address_of(window);
            let backend = self.router.provider_for_order(order);
            backend
                .save(&chunk_id, window)
                .await
                .map_err(|e| e.in_context(format!("file {} chunk {}", file_id, order)))?;
            debug!(
                %file_id,
                order,
                %chunk_id,
                backend = backend.name(),
                bytes = read,
                "chunk stored"
            );

            chunks.push(ChunkRecord {
                file_id,
                chunk_id,
                order,
                size: read as u64,
                storage_provider_name: backend.name().to_string(),
            });

            total_size += read as u64;
            order = order.checked_add(1).ok_or_else(|| {
                StorageError::Configuration(format!(
                    "{} needs more than {} chunks",
                    path.display(),
                    u32::MAX
                ))
            })?;
        }

        if total_size != expected_size {
            return Err(StorageError::Integrity {
                expected: format!("{} bytes in {}", expected_size, path.display()),
                actual: format!("{} bytes read; file changed while chunking", total_size),
            });
        }

        // Hash the source again rather than the windows, so reconstruction
        // compares against an independent digest.
        let original_checksum = checksum_of(path).await?;

        let file = FileRecord {
            id: file_id,
            file_name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            file_size: total_size,
            original_checksum,
            created_at: Utc::now(),
            chunks,
        };
        file.validate()?;

        self.metadata
            .create_file(&file)
            .await
            .map_err(|e| e.in_context(format!("recording file {}", file_id)))?;

        info!(%file_id, chunks = file.chunks.len(), size = file.file_size, "file stored");
        Ok(file)
    }
}

/// Fills `buffer` from `source` until it is full or the source is exhausted.
async fn read_window(source: &mut File, buffer: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        let read = source.read(&mut buffer[filled..]).await?;
        if read == 0 {
            break;
        }
        filled += read;
    }
    Ok(filled)
}
