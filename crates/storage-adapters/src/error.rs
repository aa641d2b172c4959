//! Adapter-level failures, folded into `DomainError::Storage` at the port.

use std::path::PathBuf;

use domains::DomainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A stored value exists but cannot be read back
    #[error("corrupt value under '{key}': {reason}")]
    Corrupt { key: String, reason: String },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<StorageError> for DomainError {
    fn from(e: StorageError) -> Self {
        DomainError::Storage(e.to_string())
    }
}
