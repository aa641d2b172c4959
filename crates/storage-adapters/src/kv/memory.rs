use async_trait::async_trait;
use dashmap::DashMap;
use domains::{KeyValueStore, Result, WriteOp};
use tokio::sync::Mutex;

/// Process-local medium. Lost on exit; used by tests and the `memory` backend.
///
/// Batches are serialized against each other. A concurrent reader may see a
/// batch partially applied.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
    batch_lock: Mutex<()>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds raw values, bypassing the repositories (fixtures, imports).
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        for (k, v) in entries {
            store.entries.insert(k.into(), v.into());
        }
        store
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.key().starts_with(prefix))
            .map(|e| e.key().clone())
            .collect())
    }

    async fn apply(&self, batch: Vec<WriteOp>) -> Result<()> {
        let _guard = self.batch_lock.lock().await;
        for op in batch {
            match op {
                WriteOp::Put { key, value } => {
                    self.entries.insert(key, value);
                }
                WriteOp::Delete { key } => {
                    self.entries.remove(&key);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn batch_puts_and_deletes() {
        let store = MemoryStore::with_entries([("profile-0xA", "{}"), ("username-old", "0xA")]);
        store
            .apply(vec![
                WriteOp::delete("username-old"),
                WriteOp::put("username-new", "0xA"),
            ])
            .await
            .unwrap();

        assert_eq!(store.get("username-old").await.unwrap(), None);
        assert_eq!(store.get("username-new").await.unwrap().as_deref(), Some("0xA"));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn prefix_scan_is_exact() {
        let store = MemoryStore::with_entries([("profile-0xA", "1"), ("profile-0xB", "2"), ("post-storage", "[]")]);
        let mut keys = store.keys_with_prefix("profile-").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["profile-0xA", "profile-0xB"]);
    }
}
