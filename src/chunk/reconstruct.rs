use std::path::Path;
use std::sync::Arc;

use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::address::{checksum_of, checksums_match};
use crate::storage::metadata::MetadataStore;
use crate::storage::router::PlacementRouter;
use crate::{FileRecord, Result, StorageError};

/// Reassembles stored files and verifies them against their original checksum.
pub struct Reconstructor {
    router: Arc<PlacementRouter>,
    metadata: Arc<dyn MetadataStore>,
}

impl Reconstructor {
    pub fn new(router: Arc<PlacementRouter>, metadata: Arc<dyn MetadataStore>) -> Self {
        Self { router, metadata }
    }

    /// Writes the file's chunks to `output_path` in order and verifies the result.
    ///
    /// On a checksum mismatch the written output is left in place and an
    /// integrity error is returned; its contents must not be trusted.
    pub async fn reconstruct<P: AsRef<Path>>(
        &self,
        file_id: &Uuid,
        output_path: P,
    ) -> Result<FileRecord> {
        let output_path = output_path.as_ref();
        let file = self
            .metadata
            .find_file_by_id(file_id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("file {}", file_id)))?;

        file.validate()?;
        let chunks = file.ordered_chunks();
        info!(
            %file_id,
            chunks = chunks.len(),
            output = %output_path.display(),
            "reconstructing file"
        );

        let mut output = File::create(output_path).await?;
        for chunk in &chunks {
            let context = format!("file {} chunk {}", file_id, chunk.order);
            let backend = self
                .router
                .provider_by_name(&chunk.storage_provider_name)
                .map_err(|e| e.in_context(&context))?;
            let data = backend
                .read(&chunk.chunk_id)
                .await
                .map_err(|e| e.in_context(&context))?;

            output.write_all(&data).await?;
            debug!(
                %file_id,
                order = chunk.order,
                chunk_id = %chunk.chunk_id,
                backend = backend.name(),
                "chunk restored"
            );
        }
        output.flush().await?;
        output.sync_all().await?;
        drop(output);

        let computed = checksum_of(output_path).await?;
        if !checksums_match(&computed, &file.original_checksum) {
            error!(
                %file_id,
                expected = %file.original_checksum,
                actual = %computed,
                "checksum mismatch after reconstruction"
            );
            return Err(StorageError::Integrity {
                expected: format!("checksum {} for file {}", file.original_checksum, file_id),
                actual: computed,
            });
        }

        info!(%file_id, output = %output_path.display(), "file reconstructed");
        Ok(file)
    }
}
