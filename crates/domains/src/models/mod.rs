//! # Domain Models
//!
//! These structs represent the core entities of Swish. Their serde layout is
//! the persisted JSON layout, so field renames here are storage migrations.

mod address;
mod amount;
mod post;
mod profile;
mod session;

pub use address::WalletAddress;
pub use amount::CoreAmount;
pub use post::{Comment, Media, NewPost, Post, PostKind};
pub use profile::{AuthorSnapshot, NewProfile, Profile, ProfileUpdate, UsernameStatus};
pub use session::{Navigation, Route, WalletStatus, RESERVED_USERNAMES};

/// Flips membership of `address` in an array-backed set.
///
/// Returns `true` when the address is present afterwards.
pub(crate) fn toggle_member(set: &mut Vec<WalletAddress>, address: &WalletAddress) -> bool {
    if let Some(pos) = set.iter().position(|a| a == address) {
        set.remove(pos);
        false
    } else {
        set.push(address.clone());
        true
    }
}

/// Inserts without duplicating. Returns `false` if already present.
pub(crate) fn insert_member(set: &mut Vec<WalletAddress>, address: &WalletAddress) -> bool {
    if set.contains(address) {
        return false;
    }
    set.push(address.clone());
    true
}

/// Removes every occurrence. Returns `false` if nothing was removed.
pub(crate) fn remove_member(set: &mut Vec<WalletAddress>, address: &WalletAddress) -> bool {
    let before = set.len();
    set.retain(|a| a != address);
    set.len() != before
}
