use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Integrity check failed: expected {expected}, got {actual}")]
    Integrity { expected: String, actual: String },
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    /// Prefixes the message with the operation that failed. Raw IO and
    /// serialization failures surfacing through a backend call become
    /// `Backend` errors so they carry the same prefix. Integrity errors
    /// already name what they compared and pass through.
    pub fn in_context(self, context: impl std::fmt::Display) -> Self {
        match self {
            StorageError::NotFound(msg) => StorageError::NotFound(format!("{}: {}", context, msg)),
            StorageError::Configuration(msg) => {
                StorageError::Configuration(format!("{}: {}", context, msg))
            }
            StorageError::Backend(msg) => StorageError::Backend(format!("{}: {}", context, msg)),
            StorageError::Io(err) => StorageError::Backend(format!("{}: {}", context, err)),
            StorageError::Serialization(err) => {
                StorageError::Backend(format!("{}: {}", context, err))
            }
            integrity @ StorageError::Integrity { .. } => integrity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_context_prefixes_not_found() {
        let err = StorageError::NotFound("chunk abc".into()).in_context("file 1 chunk 2");
        assert_eq!(err.to_string(), "Not found: file 1 chunk 2: chunk abc");
    }

    #[test]
    fn test_context_turns_io_into_backend_error() {
        let io_err = io::Error::new(io::ErrorKind::ConnectionReset, "connection reset");
        match StorageError::Io(io_err).in_context("file 1 chunk 3") {
            StorageError::Backend(msg) => assert_eq!(msg, "file 1 chunk 3: connection reset"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_context_leaves_integrity_untouched() {
        let err = StorageError::Integrity {
            expected: "a".into(),
            actual: "b".into(),
        };
        assert!(matches!(
            err.in_context("file 1"),
            StorageError::Integrity { expected, .. } if expected == "a"
        ));
    }
}
