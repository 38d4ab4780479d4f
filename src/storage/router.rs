use std::sync::Arc;

use super::backend::StorageBackend;
use crate::{Result, StorageError};

/// Fixed, ordered set of backends that chunks are striped across.
///
/// Writes place chunk `n` on `backends[n % len]`. Reads resolve the backend by
/// the name recorded with the chunk, so reordering the list after the fact does
/// not break existing files as long as every recorded name is still present.
#[derive(Clone)]
pub struct PlacementRouter {
    backends: Vec<Arc<dyn StorageBackend>>,
}

impl PlacementRouter {
    pub fn new(backends: Vec<Arc<dyn StorageBackend>>) -> Result<Self> {
        if backends.is_empty() {
            return Err(StorageError::Configuration(
                "at least one storage backend must be registered".into(),
            ));
        }

        Ok(Self { backends })
    }

    pub fn provider_for_order(&self, order: u32) -> Arc<dyn StorageBackend> {
        let index = order as usize % self.backends.len();
        Arc::clone(&self.backends[index])
    }

    pub fn provider_by_name(&self, name: &str) -> Result<Arc<dyn StorageBackend>> {
        self.backends
            .iter()
            .find(|backend| backend.name().eq_ignore_ascii_case(name))
            .map(Arc::clone)
            .ok_or_else(|| StorageError::Configuration(format!("no backend named {}", name)))
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|backend| backend.name()).collect()
    }
}
