use std::sync::Arc;

use async_trait::async_trait;
use domains::{DomainError, KeyValueStore, Post, PostRepository, Result, WriteOp};
use tracing::{debug, info};

use crate::error::StorageError;
use crate::legacy::StoredList;

/// Single key holding the whole post list.
pub const POST_STORAGE_KEY: &str = "post-storage";

/// The post list as one JSON array under [`POST_STORAGE_KEY`].
pub struct KvPostRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvPostRepository {
    /// Wraps `store`, rewriting the list once in the canonical schema if it
    /// was written in an older layout.
    pub async fn open(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let repo = Self { store };
        if let Some(raw) = repo.store.get(POST_STORAGE_KEY).await? {
            let (posts, migrated) = Self::decode(&raw)?;
            if migrated > 0 {
                repo.write(&posts).await?;
                info!(posts = posts.len(), migrated, "migrated post storage to current schema");
            }
        }
        Ok(repo)
    }

    fn decode(raw: &str) -> Result<(Vec<Post>, usize)> {
        if raw.trim().is_empty() {
            return Ok((Vec::new(), 0));
        }
        let stored: StoredList = serde_json::from_str(raw).map_err(|e| StorageError::Corrupt {
            key: POST_STORAGE_KEY.to_string(),
            reason: e.to_string(),
        })?;
        Ok(stored.into_posts())
    }

    async fn read(&self) -> Result<Vec<Post>> {
        match self.store.get(POST_STORAGE_KEY).await? {
            Some(raw) => Ok(Self::decode(&raw)?.0),
            None => Ok(Vec::new()),
        }
    }

    async fn write(&self, posts: &[Post]) -> Result<()> {
        let body = serde_json::to_string(posts).map_err(StorageError::from)?;
        self.store.apply(vec![WriteOp::put(POST_STORAGE_KEY, body)]).await
    }
}

#[async_trait]
impl PostRepository for KvPostRepository {
    async fn list(&self) -> Result<Vec<Post>> {
        self.read().await
    }

    async fn find(&self, id: &str) -> Result<Option<Post>> {
        Ok(self.read().await?.into_iter().find(|p| p.id == id))
    }

    async fn append(&self, post: &Post) -> Result<()> {
        let mut posts = self.read().await?;
        if posts.iter().any(|p| p.id == post.id) {
            return Err(DomainError::Conflict(format!("post {} already exists", post.id)));
        }
        posts.push(post.clone());
        self.write(&posts).await?;
        debug!(post_id = %post.id, total = posts.len(), "post appended");
        Ok(())
    }

    async fn replace(&self, post: &Post) -> Result<()> {
        let mut posts = self.read().await?;
        let slot = posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or_else(|| DomainError::not_found("Post", &post.id))?;
        *slot = post.clone();
        self.write(&posts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use chrono::Utc;
    use domains::{AuthorSnapshot, NewPost, PostKind, WalletAddress};

    fn post(content: &str) -> Post {
        Post::new(
            WalletAddress::parse("0xA").unwrap(),
            AuthorSnapshot {
                name: "Alice".into(),
                username: "alice".into(),
                image: String::new(),
            },
            NewPost {
                kind: PostKind::Normal,
                content: content.into(),
                media: None,
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn append_keeps_insertion_order() {
        let repo = KvPostRepository::open(Arc::new(MemoryStore::new())).await.unwrap();
        let first = post("one");
        let second = post("two");
        repo.append(&first).await.unwrap();
        repo.append(&second).await.unwrap();

        let ids: Vec<_> = repo.list().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn duplicate_id_is_a_conflict() {
        let repo = KvPostRepository::open(Arc::new(MemoryStore::new())).await.unwrap();
        let p = post("one");
        repo.append(&p).await.unwrap();
        assert!(matches!(repo.append(&p).await.unwrap_err(), DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn replace_requires_existing_post() {
        let repo = KvPostRepository::open(Arc::new(MemoryStore::new())).await.unwrap();
        let mut p = post("one");
        assert!(matches!(repo.replace(&p).await.unwrap_err(), DomainError::NotFound(..)));

        repo.append(&p).await.unwrap();
        p.toggle_like(&WalletAddress::parse("0xB").unwrap());
        repo.replace(&p).await.unwrap();
        assert_eq!(repo.find(&p.id).await.unwrap().unwrap().likes.len(), 1);
    }

    #[tokio::test]
    async fn legacy_wrapper_is_rewritten_on_open() {
        let store = Arc::new(MemoryStore::with_entries([(
            POST_STORAGE_KEY,
            r#"{"state":{"posts":[{"id":"1","type":"normal","content":"old",
                "timestamp":1712000000000,"walletAddress":"0xA",
                "user":{"name":"Alice","username":"alice","imagePreview":""}}]},"version":0}"#,
        )]));
        let repo = KvPostRepository::open(store.clone()).await.unwrap();

        let raw = store.get(POST_STORAGE_KEY).await.unwrap().unwrap();
        assert!(raw.trim_start().starts_with('['));
        let posts = repo.list().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert!(posts[0].likes.is_empty());
    }

    #[tokio::test]
    async fn migrated_wrapper_lists_oldest_first() {
        let store = Arc::new(MemoryStore::with_entries([(
            POST_STORAGE_KEY,
            r#"{"state":{"posts":[
                {"id":"2","type":"normal","content":"newer","timestamp":2000,"walletAddress":"0xA",
                 "user":{"name":"Alice","username":"alice","imagePreview":""}},
                {"id":"1","type":"normal","content":"older","timestamp":1000,"walletAddress":"0xA",
                 "user":{"name":"Alice","username":"alice","imagePreview":""}}
            ]},"version":0}"#,
        )]));
        let repo = KvPostRepository::open(store).await.unwrap();
        let appended = post("fresh");
        repo.append(&appended).await.unwrap();

        let ids: Vec<_> = repo.list().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["1".to_string(), "2".to_string(), appended.id]);
    }

    #[tokio::test]
    async fn malformed_list_is_a_storage_error() {
        let store = Arc::new(MemoryStore::with_entries([(POST_STORAGE_KEY, "42")]));
        let err = KvPostRepository::open(store).await.err().unwrap();
        assert!(matches!(err, DomainError::Storage(_)));
    }
}
