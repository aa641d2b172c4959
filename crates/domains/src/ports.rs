//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be wired into the services.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::{Result, WalletError};
use crate::models::{CoreAmount, Post, Profile, WalletAddress};

/// One mutation inside a [`KeyValueStore::apply`] batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Put { key: String, value: String },
    Delete { key: String },
}

impl WriteOp {
    pub fn put(key: impl Into<String>, value: impl Into<String>) -> Self {
        WriteOp::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<String>) -> Self {
        WriteOp::Delete { key: key.into() }
    }
}

/// The string key/value medium every record is persisted in.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// All keys starting with `prefix`, in unspecified order.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;

    /// Applies every op or none of them.
    async fn apply(&self, batch: Vec<WriteOp>) -> Result<()>;
}

/// Persistence contract for profile records and the username index.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find(&self, address: &WalletAddress) -> Result<Option<Profile>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Profile>>;

    /// Current holder of `username`. Index entries whose record no longer
    /// carries the name count as free.
    async fn username_owner(&self, username: &str) -> Result<Option<WalletAddress>>;

    async fn list(&self) -> Result<Vec<Profile>>;

    /// Writes a new record and claims its username in one batch.
    async fn insert(&self, profile: &Profile) -> Result<()>;

    /// Rewrites a record, moving the username index entry if it changed.
    async fn update(&self, before: &Profile, after: &Profile) -> Result<()>;

    /// Writes two records as one unit (follow/unfollow).
    async fn save_pair(&self, first: &Profile, second: &Profile) -> Result<()>;
}

/// Persistence contract for the post list.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// All posts in insertion order.
    async fn list(&self) -> Result<Vec<Post>>;

    async fn find(&self, id: &str) -> Result<Option<Post>>;

    async fn append(&self, post: &Post) -> Result<()>;

    /// Replaces the post with the same id. `NotFound` if there is none.
    async fn replace(&self, post: &Post) -> Result<()>;
}

/// What the mint collaborator is asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintRequest {
    pub address: WalletAddress,
    pub name: String,
    pub username: String,
    pub price: CoreAmount,
}

/// Result reported by a [`MintGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintOutcome {
    Minted { token_id: Option<String> },
    UserRejected,
    InsufficientFunds,
    ChainError(String),
}

/// Why a mint left the profile unminted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MintFailure {
    UserRejected,
    InsufficientFunds,
    ChainError(String),
    TimedOut { after_ms: u64 },
}

impl fmt::Display for MintFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MintFailure::UserRejected => f.write_str("rejected by the user"),
            MintFailure::InsufficientFunds => f.write_str("insufficient funds"),
            MintFailure::ChainError(reason) => write!(f, "chain error: {reason}"),
            MintFailure::TimedOut { after_ms } => write!(f, "timed out after {after_ms}ms"),
        }
    }
}

/// Profile NFT minting capability.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MintGateway: Send + Sync {
    async fn mint(&self, request: &MintRequest) -> MintOutcome;
}

/// Wallet connection library contract.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait WalletGateway: Send + Sync {
    /// Connects on `chain_id` and returns the selected account.
    async fn connect(&self, chain_id: u64) -> std::result::Result<WalletAddress, WalletError>;

    async fn switch_chain(&self, chain_id: u64) -> std::result::Result<(), WalletError>;

    /// Sends native value and returns the transaction hash.
    async fn send_value(
        &self,
        from: &WalletAddress,
        to: &WalletAddress,
        amount: CoreAmount,
    ) -> std::result::Result<String, WalletError>;

    /// Chain id changes as reported by the wallet.
    fn chain_changes(&self) -> watch::Receiver<Option<u64>>;
}
