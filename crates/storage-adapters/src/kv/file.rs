use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use domains::{KeyValueStore, Result, WriteOp};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::StorageError;

/// Durable medium: one JSON object of string keys to string values.
///
/// The whole map is cached in memory. Each batch is written to a sibling
/// temp file and renamed over the original, so a crash leaves either the old
/// or the new state on disk.
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Opens `path`, creating parent directories. A missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> std::result::Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(parent, e))?;
        }

        let entries = match fs::read_to_string(&path).await {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt {
                key: path.display().to_string(),
                reason: e.to_string(),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StorageError::io(&path, e)),
        };
        info!(path = %path.display(), keys = entries.len(), "opened key/value file");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> std::result::Result<(), StorageError> {
        let body = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        let mut file = fs::File::create(&tmp).await.map_err(|e| StorageError::io(&tmp, e))?;
        file.write_all(&body).await.map_err(|e| StorageError::io(&tmp, e))?;
        // contents must be durable before the rename makes them visible
        file.sync_all().await.map_err(|e| StorageError::io(&tmp, e))?;
        drop(file);
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;
        debug!(path = %self.path.display(), bytes = body.len(), "persisted key/value file");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .entries
            .read()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn apply(&self, batch: Vec<WriteOp>) -> Result<()> {
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        for op in batch {
            match op {
                WriteOp::Put { key, value } => {
                    next.insert(key, value);
                }
                WriteOp::Delete { key } => {
                    next.remove(&key);
                }
            }
        }
        // memory only moves forward once the file is in place
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }
}
