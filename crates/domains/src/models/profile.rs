use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{insert_member, remove_member, WalletAddress};

/// One profile per wallet address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Filled from the storage key when an older record omits it
    #[serde(default)]
    pub address: WalletAddress,
    pub name: String,
    /// Unique across all profiles, case-sensitive as stored
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub bio: String,
    /// Opaque data-URI, or empty when no picture was chosen
    #[serde(rename = "imagePreview", default, deserialize_with = "null_as_empty")]
    pub image: String,
    /// One-way flag; a minted profile is frozen apart from its social graph
    #[serde(default)]
    pub nft_minted: bool,
    #[serde(default)]
    pub followers: Vec<WalletAddress>,
    #[serde(default)]
    pub following: Vec<WalletAddress>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Fields a user supplies when creating a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProfile {
    pub name: String,
    pub username: String,
    pub bio: String,
    pub image: String,
}

/// Partial edit of a profile; `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.username.is_none() && self.bio.is_none() && self.image.is_none()
    }
}

/// Author display data copied onto posts and comments at creation time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSnapshot {
    pub name: String,
    pub username: String,
    #[serde(rename = "imagePreview", default, deserialize_with = "null_as_empty")]
    pub image: String,
}

impl Profile {
    pub fn new(address: WalletAddress, fields: NewProfile, created_at: DateTime<Utc>) -> Self {
        Self {
            address,
            name: fields.name,
            username: fields.username,
            bio: fields.bio,
            image: fields.image,
            nft_minted: false,
            followers: Vec::new(),
            following: Vec::new(),
            created_at,
        }
    }

    /// Merges the provided fields. Callers check `nft_minted` first.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(username) = update.username {
            self.username = username;
        }
        if let Some(bio) = update.bio {
            self.bio = bio;
        }
        if let Some(image) = update.image {
            self.image = image;
        }
    }

    pub fn author_snapshot(&self) -> AuthorSnapshot {
        let name = if self.name.trim().is_empty() {
            "Anonymous".to_string()
        } else {
            self.name.clone()
        };
        AuthorSnapshot {
            name,
            username: self.username.clone(),
            image: self.image.clone(),
        }
    }

    pub fn is_following(&self, address: &WalletAddress) -> bool {
        self.following.contains(address)
    }

    pub fn is_followed_by(&self, address: &WalletAddress) -> bool {
        self.followers.contains(address)
    }

    pub(crate) fn add_following(&mut self, address: &WalletAddress) -> bool {
        insert_member(&mut self.following, address)
    }

    pub(crate) fn add_follower(&mut self, address: &WalletAddress) -> bool {
        insert_member(&mut self.followers, address)
    }

    pub(crate) fn drop_following(&mut self, address: &WalletAddress) -> bool {
        remove_member(&mut self.following, address)
    }

    pub(crate) fn drop_follower(&mut self, address: &WalletAddress) -> bool {
        remove_member(&mut self.followers, address)
    }

    /// Records `self` following `target` on both records.
    ///
    /// Returns `false` when the relation already existed on both sides.
    pub fn follow(&mut self, target: &mut Profile) -> bool {
        let a = self.add_following(&target.address);
        let b = target.add_follower(&self.address);
        a || b
    }

    /// Removes the relation from both records.
    ///
    /// Returns `false` when neither side recorded it.
    pub fn unfollow(&mut self, target: &mut Profile) -> bool {
        let a = self.drop_following(&target.address);
        let b = target.drop_follower(&self.address);
        a || b
    }
}

/// Outcome of the username availability rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsernameStatus {
    Available,
    /// Three characters or fewer
    TooShort,
    ContainsWhitespace,
    /// Collides with a route name
    Reserved,
    /// Already held by another profile
    Taken,
}

impl UsernameStatus {
    pub fn is_available(self) -> bool {
        matches!(self, UsernameStatus::Available)
    }
}

impl fmt::Display for UsernameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            UsernameStatus::Available => "username is available",
            UsernameStatus::TooShort => "username must be longer than 3 characters",
            UsernameStatus::ContainsWhitespace => "username must not contain spaces",
            UsernameStatus::Reserved => "this username is not allowed",
            UsernameStatus::Taken => "username is already taken",
        };
        f.write_str(msg)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(address: &str, username: &str) -> Profile {
        Profile::new(
            WalletAddress::parse(address).unwrap(),
            NewProfile {
                name: username.to_uppercase(),
                username: username.into(),
                ..Default::default()
            },
            Utc::now(),
        )
    }

    #[test]
    fn follow_updates_both_sides_once() {
        let mut a = profile("0xA", "alice");
        let mut b = profile("0xB", "bobby");

        assert!(b.follow(&mut a));
        assert!(!b.follow(&mut a));
        assert_eq!(a.followers, vec![b.address.clone()]);
        assert_eq!(b.following, vec![a.address.clone()]);

        assert!(b.unfollow(&mut a));
        assert!(a.followers.is_empty());
        assert!(b.following.is_empty());
        assert!(!b.unfollow(&mut a));
    }

    #[test]
    fn reads_stored_record_shape() {
        let raw = r#"{
            "name": "Alice",
            "username": "alice",
            "bio": "hi",
            "profileImage": null,
            "imagePreview": null,
            "address": "0xA",
            "nftMinted": false,
            "createdAt": "2025-04-01T10:00:00.000Z",
            "followers": [],
            "following": ["0xB"]
        }"#;
        let p: Profile = serde_json::from_str(raw).unwrap();
        assert_eq!(p.username, "alice");
        assert_eq!(p.image, "");
        assert_eq!(p.following, vec![WalletAddress::parse("0xB").unwrap()]);
    }

    #[test]
    fn snapshot_falls_back_to_anonymous() {
        let mut p = profile("0xA", "alice");
        p.name = "  ".into();
        assert_eq!(p.author_snapshot().name, "Anonymous");
    }

    #[test]
    fn apply_merges_only_given_fields() {
        let mut p = profile("0xA", "alice");
        p.apply(ProfileUpdate {
            bio: Some("new bio".into()),
            ..Default::default()
        });
        assert_eq!(p.bio, "new bio");
        assert_eq!(p.username, "alice");
        assert!(ProfileUpdate::default().is_empty());
    }
}
