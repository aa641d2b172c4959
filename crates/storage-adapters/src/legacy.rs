//! Older `post-storage` layouts and their conversion to the canonical schema.
//!
//! Two shapes predate the current one:
//! - a persisted-state wrapper `{"state": {"posts": [...]}, "version": 0}`
//!   around posts with a numeric millisecond timestamp and no likes/comments;
//! - a bare array whose timestamps are millisecond strings.

use chrono::{DateTime, Utc};
use domains::{AuthorSnapshot, Comment, Post, PostKind, WalletAddress};
use serde::Deserialize;
use tracing::warn;

/// Whatever may sit under `post-storage`.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum StoredList {
    Plain(Vec<StoredPost>),
    Persisted { state: PersistedState },
}

#[derive(Deserialize)]
pub(crate) struct PersistedState {
    #[serde(default)]
    posts: Vec<StoredPost>,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum StoredPost {
    Current(Post),
    Legacy(LegacyPost),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LegacyPost {
    id: String,
    #[serde(rename = "type", default)]
    kind: PostKind,
    #[serde(default)]
    content: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    video: Option<String>,
    timestamp: LegacyTimestamp,
    wallet_address: WalletAddress,
    user: AuthorSnapshot,
    #[serde(default)]
    likes: Vec<WalletAddress>,
    #[serde(default)]
    comments: Vec<Comment>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LegacyTimestamp {
    Millis(i64),
    Text(String),
}

impl LegacyTimestamp {
    fn to_utc(&self, post_id: &str) -> DateTime<Utc> {
        let parsed = match self {
            LegacyTimestamp::Millis(ms) => DateTime::from_timestamp_millis(*ms),
            LegacyTimestamp::Text(raw) => match raw.trim().parse::<i64>() {
                Ok(ms) => DateTime::from_timestamp_millis(ms),
                Err(_) => DateTime::parse_from_rfc3339(raw.trim())
                    .ok()
                    .map(|t| t.with_timezone(&Utc)),
            },
        };
        parsed.unwrap_or_else(|| {
            warn!(post_id, "unreadable legacy timestamp, using the epoch");
            DateTime::<Utc>::UNIX_EPOCH
        })
    }
}

impl StoredList {
    /// Canonical posts plus the number of records that needed conversion.
    /// A wrapper counts as one conversion even when it holds no posts.
    /// Wrapped lists are stored newest first and come back in insertion order.
    pub(crate) fn into_posts(self) -> (Vec<Post>, usize) {
        let (stored, mut migrated) = match self {
            StoredList::Plain(posts) => (posts, 0),
            StoredList::Persisted { mut state } => {
                state.posts.reverse();
                (state.posts, 1)
            }
        };
        let posts = stored
            .into_iter()
            .map(|p| match p {
                StoredPost::Current(post) => post,
                StoredPost::Legacy(legacy) => {
                    migrated += 1;
                    legacy.into_post()
                }
            })
            .collect();
        (posts, migrated)
    }
}

impl LegacyPost {
    fn into_post(self) -> Post {
        let timestamp = self.timestamp.to_utc(&self.id);
        Post {
            id: self.id,
            kind: self.kind,
            content: self.content,
            image: self.image.filter(|s| !s.is_empty()),
            video: self.video.filter(|s| !s.is_empty()),
            timestamp,
            wallet_address: self.wallet_address,
            user: self.user,
            likes: self.likes,
            comments: self.comments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_wrapper_with_numeric_timestamps() {
        let raw = r#"{"state":{"posts":[{
            "id":"1712000000000","type":"membership","content":"hello",
            "timestamp":1712000000000,"walletAddress":"0xA",
            "user":{"name":"Alice","username":"alice","imagePreview":""}
        }]},"version":0}"#;
        let (posts, migrated) = serde_json::from_str::<StoredList>(raw).unwrap().into_posts();
        assert_eq!(migrated, 2);
        assert_eq!(posts[0].kind, PostKind::Membership);
        assert_eq!(posts[0].timestamp.timestamp_millis(), 1_712_000_000_000);
        assert!(posts[0].likes.is_empty() && posts[0].comments.is_empty());
    }

    #[test]
    fn persisted_wrapper_is_restored_to_insertion_order() {
        let raw = r#"{"state":{"posts":[
            {"id":"2","content":"second","timestamp":2000,"walletAddress":"0xA",
             "user":{"name":"Alice","username":"alice","imagePreview":""}},
            {"id":"1","content":"first","timestamp":1000,"walletAddress":"0xA",
             "user":{"name":"Alice","username":"alice","imagePreview":""}}
        ]},"version":0}"#;
        let (posts, _) = serde_json::from_str::<StoredList>(raw).unwrap().into_posts();
        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn bare_array_with_string_millis() {
        let raw = r#"[{
            "id":"1","type":"normal","content":"hi","video":"data:video/mp4;base64,AA",
            "timestamp":"1712000000000","walletAddress":"0xA","likes":["0xB"],"comments":[],
            "user":{"name":"Alice","username":"alice","imagePreview":""}
        }]"#;
        let (posts, migrated) = serde_json::from_str::<StoredList>(raw).unwrap().into_posts();
        assert_eq!(migrated, 1);
        assert_eq!(posts[0].likes.len(), 1);
        assert!(posts[0].video.is_some());
    }

    #[test]
    fn canonical_records_are_untouched() {
        let raw = r#"[{
            "id":"1","type":"normal","content":"hi",
            "timestamp":"2025-04-01T10:00:00Z","walletAddress":"0xA","likes":[],"comments":[],
            "user":{"name":"Alice","username":"alice","imagePreview":""}
        }]"#;
        let (_, migrated) = serde_json::from_str::<StoredList>(raw).unwrap().into_posts();
        assert_eq!(migrated, 0);
    }

    #[test]
    fn garbage_timestamp_falls_back_to_epoch() {
        let ts = LegacyTimestamp::Text("yesterday".into());
        assert_eq!(ts.to_utc("x"), DateTime::<Utc>::UNIX_EPOCH);
    }
}
