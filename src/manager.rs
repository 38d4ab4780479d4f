use std::path::Path;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::chunk::pipeline::ChunkingPipeline;
use crate::chunk::reconstruct::Reconstructor;
use crate::chunk::ChunkSizer;
use crate::config::{BackendConfig, Settings};
use crate::storage::backend::StorageBackend;
use crate::storage::cache::CachedBackend;
use crate::storage::disk::FileSystemBackend;
use crate::storage::metadata::{JsonMetadataStore, MetadataStore};
use crate::storage::router::PlacementRouter;
use crate::{ChunkRecord, FileRecord, Result};

/// Wires backends, router, metadata store, pipeline and reconstructor together.
#[derive(Clone)]
pub struct StorageManager {
    router: Arc<PlacementRouter>,
    metadata: Arc<dyn MetadataStore>,
    pipeline: Arc<ChunkingPipeline>,
    reconstructor: Arc<Reconstructor>,
}

impl StorageManager {
    pub fn new(
        sizer: ChunkSizer,
        backends: Vec<Arc<dyn StorageBackend>>,
        metadata: Arc<dyn MetadataStore>,
    ) -> Result<Self> {
        let router = Arc::new(PlacementRouter::new(backends)?);
        let pipeline = Arc::new(ChunkingPipeline::new(
            sizer,
            Arc::clone(&router),
            Arc::clone(&metadata),
        ));
        let reconstructor = Arc::new(Reconstructor::new(
            Arc::clone(&router),
            Arc::clone(&metadata),
        ));

        Ok(Self {
            router,
            metadata,
            pipeline,
            reconstructor,
        })
    }

    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let sizer = ChunkSizer::new(settings.chunking)?;

        let mut backends = Vec::with_capacity(settings.backends.len());
        for backend in &settings.backends {
            backends.push(build_backend(backend).await?);
        }

        let metadata: Arc<dyn MetadataStore> =
            Arc::new(JsonMetadataStore::new(&settings.metadata.path).await?);
        let manager = Self::new(sizer, backends, metadata)?;
        info!(backends = ?manager.router.backend_names(), "storage manager ready");
        Ok(manager)
    }

    pub fn router(&self) -> &PlacementRouter {
        &self.router
    }

    pub async fn chunk_and_store<P: AsRef<Path>>(&self, path: P) -> Result<Vec<ChunkRecord>> {
        self.pipeline.chunk_and_store(path).await
    }

    pub async fn upload_file<P: AsRef<Path>>(&self, path: P) -> Result<FileRecord> {
        self.pipeline.store_file(path).await
    }

    pub async fn reconstruct<P: AsRef<Path>>(
        &self,
        file_id: &Uuid,
        output_path: P,
    ) -> Result<FileRecord> {
        self.reconstructor.reconstruct(file_id, output_path).await
    }

    pub async fn list_files(&self) -> Result<Vec<FileRecord>> {
        self.metadata.list_files().await
    }

    pub async fn delete_file(&self, file_id: &Uuid) -> Result<()> {
        self.metadata.delete_file(file_id).await?;
        info!(%file_id, "file record deleted");
        Ok(())
    }
}

async fn build_backend(config: &BackendConfig) -> Result<Arc<dyn StorageBackend>> {
    let backend: Arc<dyn StorageBackend> = match config {
        BackendConfig::Filesystem { name, path, .. } => {
            Arc::new(FileSystemBackend::new(name.clone(), path).await?)
        }
    };

    match config.cache_capacity() {
        Some(capacity) => Ok(Arc::new(CachedBackend::new(backend, capacity)?)),
        None => Ok(backend),
    }
}
