use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{FileRecord, Result, StorageError};

/// Durable record of chunked files.
///
/// `create_file` stores a file together with its full chunk list in one
/// write; readers never observe a file with a partial chunk list.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn create_file(&self, file: &FileRecord) -> Result<()>;
    async fn find_file_by_id(&self, id: &Uuid) -> Result<Option<FileRecord>>;
    async fn list_files(&self) -> Result<Vec<FileRecord>>;
    /// Removes the file and every chunk record it owns. Chunk bytes stay on
    /// their backends.
    async fn delete_file(&self, id: &Uuid) -> Result<()>;
}

fn backend_io(action: &str, path: &Path, err: std::io::Error) -> StorageError {
    StorageError::Backend(format!(
        "metadata store failed to {} {}: {}",
        action,
        path.display(),
        err
    ))
}

/// One JSON document per file under a metadata directory.
pub struct JsonMetadataStore {
    metadata_path: PathBuf,
}

impl JsonMetadataStore {
    pub async fn new<P: AsRef<Path>>(metadata_path: P) -> Result<Self> {
        let metadata_path = metadata_path.as_ref().to_owned();
        fs::create_dir_all(&metadata_path).await?;
        Ok(Self { metadata_path })
    }

    fn get_metadata_path(&self, id: &Uuid) -> PathBuf {
        self.metadata_path.join(format!("{}.json", id))
    }
}

#[async_trait]
impl MetadataStore for JsonMetadataStore {
    async fn create_file(&self, file: &FileRecord) -> Result<()> {
        let final_path = self.get_metadata_path(&file.id);
        let exists = fs::try_exists(&final_path)
            .await
            .map_err(|e| backend_io("inspect", &final_path, e))?;
        if exists {
            return Err(StorageError::Backend(format!(
                "file {} is already recorded",
                file.id
            )));
        }

        let metadata_json = serde_json::to_string_pretty(file)?;

        // Rename is atomic within a directory, so the record appears whole or not at all.
        let temp_path = self.metadata_path.join(format!("{}.json.tmp", file.id));
        fs::write(&temp_path, metadata_json)
            .await
            .map_err(|e| backend_io("write", &temp_path, e))?;
        fs::rename(&temp_path, &final_path)
            .await
            .map_err(|e| backend_io("commit", &final_path, e))?;
        Ok(())
    }

    async fn find_file_by_id(&self, id: &Uuid) -> Result<Option<FileRecord>> {
        let metadata_path = self.get_metadata_path(id);
        let metadata_content = match fs::read_to_string(&metadata_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(backend_io("read", &metadata_path, e)),
        };

        let file: FileRecord = serde_json::from_str(&metadata_content)?;
        Ok(Some(file))
    }

    async fn list_files(&self) -> Result<Vec<FileRecord>> {
        let mut files = Vec::new();

        let mut entries = fs::read_dir(&self.metadata_path)
            .await
            .map_err(|e| backend_io("list", &self.metadata_path, e))?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_json = path.extension().is_some_and(|ext| ext == "json");
            if entry.file_type().await?.is_file() && is_json {
                let metadata_content = fs::read_to_string(&path)
                    .await
                    .map_err(|e| backend_io("read", &path, e))?;
                let file: FileRecord = serde_json::from_str(&metadata_content)?;
                files.push(file);
            }
        }

        files.sort_by_key(|file| file.created_at);
        Ok(files)
    }

    async fn delete_file(&self, id: &Uuid) -> Result<()> {
        let metadata_path = self.get_metadata_path(id);
        match fs::remove_file(&metadata_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(format!("file {}", id)))
            }
            Err(e) => Err(backend_io("delete", &metadata_path, e)),
        }
    }
}

/// In-process metadata store.
#[derive(Default)]
pub struct MemoryMetadataStore {
    files: Mutex<HashMap<Uuid, FileRecord>>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    async fn create_file(&self, file: &FileRecord) -> Result<()> {
        let mut files = self.files.lock().await;
        if files.contains_key(&file.id) {
            return Err(StorageError::Backend(format!(
                "file {} is already recorded",
                file.id
            )));
        }
        files.insert(file.id, file.clone());
        Ok(())
    }

    async fn find_file_by_id(&self, id: &Uuid) -> Result<Option<FileRecord>> {
        Ok(self.files.lock().await.get(id).cloned())
    }

    async fn list_files(&self) -> Result<Vec<FileRecord>> {
        let mut files: Vec<FileRecord> = self.files.lock().await.values().cloned().collect();
        files.sort_by_key(|file| file.created_at);
        Ok(files)
    }

    async fn delete_file(&self, id: &Uuid) -> Result<()> {
        self.files
            .lock()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(format!("file {}", id)))
    }
}
