use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{toggle_member, AuthorSnapshot, WalletAddress};
use crate::error::DomainError;

/// Audience of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    #[default]
    Normal,
    /// Shown on the author's members tab, never on the home feed
    Membership,
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostKind::Normal => f.write_str("normal"),
            PostKind::Membership => f.write_str("membership"),
        }
    }
}

impl FromStr for PostKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(PostKind::Normal),
            "membership" => Ok(PostKind::Membership),
            other => Err(DomainError::Validation(format!("unknown post type '{other}'"))),
        }
    }
}

/// Attached media. A post carries at most one of the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Media {
    Image(String),
    Video(String),
}

/// Fields a user supplies when publishing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPost {
    pub kind: PostKind,
    pub content: String,
    pub media: Option<Media>,
}

/// The fundamental unit of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Time-ordered UUID v7
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PostKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub wallet_address: WalletAddress,
    pub user: AuthorSnapshot,
    #[serde(default)]
    pub likes: Vec<WalletAddress>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn new(author: WalletAddress, user: AuthorSnapshot, fields: NewPost, timestamp: DateTime<Utc>) -> Self {
        let (image, video) = match fields.media {
            Some(Media::Image(data)) => (Some(data), None),
            Some(Media::Video(data)) => (None, Some(data)),
            None => (None, None),
        };
        Self {
            id: Uuid::now_v7().to_string(),
            kind: fields.kind,
            content: fields.content,
            image,
            video,
            timestamp,
            wallet_address: author,
            user,
            likes: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Flips the like of `address`. Returns `true` if the post is now liked by it.
    pub fn toggle_like(&mut self, address: &WalletAddress) -> bool {
        toggle_member(&mut self.likes, address)
    }

    pub fn is_liked_by(&self, address: &WalletAddress) -> bool {
        self.likes.contains(address)
    }

    pub fn comment(&self, comment_id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }

    pub fn comment_mut(&mut self, comment_id: &str) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|c| c.id == comment_id)
    }

    /// Comments are append-only.
    pub fn push_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }
}

/// A reply under a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub user: AuthorSnapshot,
    pub content: String,
    #[serde(default)]
    pub likes: Vec<WalletAddress>,
}

impl Comment {
    pub fn new(user: AuthorSnapshot, content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user,
            content,
            likes: Vec::new(),
        }
    }

    pub fn toggle_like(&mut self, address: &WalletAddress) -> bool {
        toggle_member(&mut self.likes, address)
    }
}
