//! # storage-adapters
//!
//! Implementations of the `domains` ports over a string key/value medium,
//! plus local stand-ins for the chain-facing collaborators.
//!
//! Key layout:
//! - `profile-<address>` → JSON profile
//! - `username-<username>` → owning address
//! - `post-storage` → JSON array of posts

pub mod error;
pub mod kv;
mod legacy;
pub mod minter;
pub mod post_repo;
pub mod profile_repo;
pub mod wallet;

pub use error::StorageError;
pub use kv::{JsonFileStore, MemoryStore};
pub use minter::SimulatedMinter;
pub use post_repo::{KvPostRepository, POST_STORAGE_KEY};
pub use profile_repo::{KvProfileRepository, PROFILE_KEY_PREFIX, USERNAME_KEY_PREFIX};
pub use wallet::OfflineWallet;
