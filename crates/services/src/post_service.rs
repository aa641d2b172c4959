//! # Post Store
//!
//! Publishing, likes and comments. Mutations locate the post, transform an
//! owned copy and hand it back to the repository, which rewrites the stored
//! list in one write.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    AuthorSnapshot, Comment, DomainError, Media, NewPost, Post, PostKind, PostRepository,
    ProfileRepository, Result, WalletAddress,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    profiles: Arc<dyn ProfileRepository>,
    write_lock: Mutex<()>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self {
            posts,
            profiles,
            write_lock: Mutex::new(()),
        }
    }

    /// Publishes a post for `author`, who must hold a minted profile.
    pub async fn create(&self, author: &WalletAddress, fields: NewPost) -> Result<Post> {
        if fields.content.trim().is_empty() {
            return Err(DomainError::Validation("post content is empty".into()));
        }
        if let Some(Media::Image(data) | Media::Video(data)) = &fields.media {
            if data.is_empty() {
                return Err(DomainError::Validation("attached media is empty".into()));
            }
        }

        let profile = self
            .profiles
            .find(author)
            .await?
            .ok_or_else(|| DomainError::NotEligible("complete your profile before posting".into()))?;
        if !profile.nft_minted {
            return Err(DomainError::NotEligible("mint your profile NFT to post".into()));
        }

        let post = Post::new(author.clone(), profile.author_snapshot(), fields, Utc::now());
        self.append(post).await
    }

    /// Appends a fully built post to the end of the stored list.
    pub async fn append(&self, post: Post) -> Result<Post> {
        let _guard = self.write_lock.lock().await;
        if self.posts.find(&post.id).await?.is_some() {
            return Err(DomainError::Conflict(format!("post {} already exists", post.id)));
        }
        self.posts.append(&post).await?;
        info!(post_id = %post.id, author = %post.wallet_address, kind = %post.kind, "post published");
        Ok(post)
    }

    pub async fn get(&self, post_id: &str) -> Result<Option<Post>> {
        self.posts.find(post_id).await
    }

    pub async fn toggle_like(&self, post_id: &str, address: &WalletAddress) -> Result<Post> {
        let _guard = self.write_lock.lock().await;
        let mut post = self.require(post_id).await?;
        let liked = post.toggle_like(address);
        self.posts.replace(&post).await?;
        debug!(post_id, %address, liked, "post like toggled");
        Ok(post)
    }

    /// Appends a comment by `author`. Addresses without a profile comment
    /// as `Anonymous`.
    pub async fn add_comment(&self, post_id: &str, author: &WalletAddress, content: &str) -> Result<Post> {
        if content.trim().is_empty() {
            return Err(DomainError::Validation("comment is empty".into()));
        }
        let snapshot = match self.profiles.find(author).await? {
            Some(profile) => profile.author_snapshot(),
            None => AuthorSnapshot {
                name: "Anonymous".into(),
                ..AuthorSnapshot::default()
            },
        };

        let _guard = self.write_lock.lock().await;
        let mut post = self.require(post_id).await?;
        let comment = Comment::new(snapshot, content.to_string());
        let comment_id = comment.id.clone();
        post.push_comment(comment);
        self.posts.replace(&post).await?;
        info!(post_id, %comment_id, %author, "comment added");
        Ok(post)
    }

    pub async fn toggle_comment_like(
        &self,
        post_id: &str,
        comment_id: &str,
        address: &WalletAddress,
    ) -> Result<Post> {
        let _guard = self.write_lock.lock().await;
        let mut post = self.require(post_id).await?;
        let liked = post
            .comment_mut(comment_id)
            .ok_or_else(|| DomainError::not_found("Comment", comment_id))?
            .toggle_like(address);
        self.posts.replace(&post).await?;
        debug!(post_id, comment_id, %address, liked, "comment like toggled");
        Ok(post)
    }

    /// Normal posts, newest first.
    pub async fn home_feed(&self) -> Result<Vec<Post>> {
        let posts = self.posts.list().await?;
        Ok(newest_first(posts.into_iter().filter(|p| p.kind == PostKind::Normal)))
    }

    /// One tab of a profile page, newest first.
    pub async fn posts_by_username(&self, username: &str, kind: PostKind) -> Result<Vec<Post>> {
        let posts = self.posts.list().await?;
        Ok(newest_first(
            posts
                .into_iter()
                .filter(|p| p.user.username == username && p.kind == kind),
        ))
    }

    async fn require(&self, post_id: &str) -> Result<Post> {
        self.posts
            .find(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }
}

/// Stored order is insertion order; later entries win timestamp ties.
fn newest_first(posts: impl Iterator<Item = Post>) -> Vec<Post> {
    let mut out: Vec<Post> = posts.collect();
    out.reverse();
    out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    out
}
