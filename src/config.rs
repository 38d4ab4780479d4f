use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chunk::ChunkingConfig;
use crate::{Result, StorageError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub chunking: ChunkingConfig,
    pub metadata: MetadataConfig,
    /// Registration order is placement order.
    pub backends: Vec<BackendConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataConfig {
    pub path: PathBuf,
}

/// Backends a settings file can register.
///
/// Only durable media are accepted here: the metadata store is always on disk,
/// so a process-local backend would record chunks that vanish on exit.
/// `MemoryBackend` is wired in code through `StorageManager::new` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    Filesystem {
        name: String,
        path: PathBuf,
        #[serde(default)]
        cache_capacity: Option<usize>,
    },
}

impl BackendConfig {
    pub fn name(&self) -> &str {
        match self {
            BackendConfig::Filesystem { name, .. } => name,
        }
    }

    pub fn cache_capacity(&self) -> Option<usize> {
        match self {
            BackendConfig::Filesystem { cache_capacity, .. } => *cache_capacity,
        }
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./storage/metadata"),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chunking: ChunkingConfig::default(),
            metadata: MetadataConfig::default(),
            backends: vec![
                BackendConfig::Filesystem {
                    name: "FileSystem".into(),
                    path: PathBuf::from("./storage/chunks/filesystem"),
                    cache_capacity: None,
                },
                BackendConfig::Filesystem {
                    name: "Archive".into(),
                    path: PathBuf::from("./storage/chunks/archive"),
                    cache_capacity: None,
                },
            ],
        }
    }
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            StorageError::Configuration(format!(
                "failed to read settings {}: {}",
                path.display(),
                e
            ))
        })?;
        let settings: Settings = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects backend lists the router could not serve unambiguously.
    pub fn validate(&self) -> Result<()> {
        if self.backends.is_empty() {
            return Err(StorageError::Configuration(
                "no storage backends configured".into(),
            ));
        }

        for (index, backend) in self.backends.iter().enumerate() {
            let duplicate = self.backends[..index]
                .iter()
                .any(|earlier| earlier.name().eq_ignore_ascii_case(backend.name()));
            if duplicate {
                return Err(StorageError::Configuration(format!(
                    "backend name {} is registered more than once",
                    backend.name()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filesystem(name: &str) -> BackendConfig {
        BackendConfig::Filesystem {
            name: name.into(),
            path: PathBuf::from("/tmp/chunks"),
            cache_capacity: None,
        }
    }

    #[test]
    fn test_parse_settings_with_defaults() {
        let json = r#"{
            "chunking": { "target_chunk_count": 4 },
            "metadata": { "path": "/tmp/meta" },
            "backends": [
                { "kind": "filesystem", "name": "FileSystem", "path": "/tmp/chunks" },
                {
                    "kind": "filesystem",
                    "name": "Archive",
                    "path": "/tmp/archive",
                    "cache_capacity": 16
                }
            ]
        }"#;

        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.chunking.target_chunk_count, 4);
        assert_eq!(
            settings.chunking.min_chunk_size,
            crate::chunk::DEFAULT_MIN_CHUNK_SIZE
        );
        assert_eq!(settings.backends.len(), 2);
        assert_eq!(settings.backends[1].name(), "Archive");
        assert_eq!(settings.backends[1].cache_capacity(), Some(16));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_memory_backend_is_not_configurable() {
        let json = r#"{
            "metadata": { "path": "/tmp/meta" },
            "backends": [ { "kind": "memory", "name": "Redis" } ]
        }"#;

        let result = serde_json::from_str::<Settings>(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_memory_backend_rejected_when_loading_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{ "backends": [ { "kind": "memory", "name": "Redis" } ] }"#,
        )
        .unwrap();

        assert!(matches!(
            Settings::load(&path),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let settings = Settings {
            backends: vec![filesystem("Archive"), filesystem("archive")],
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(StorageError::Configuration(_))
        ));
    }

    #[test]
    fn test_empty_backends_are_rejected() {
        let settings = Settings {
            backends: Vec::new(),
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(StorageError::Configuration(_))
        ));
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let result = Settings::load("/definitely/not/here/settings.json");
        assert!(matches!(result, Err(StorageError::Configuration(_))));
    }
}
