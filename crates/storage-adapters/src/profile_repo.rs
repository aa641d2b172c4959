use std::sync::Arc;

use async_trait::async_trait;
use domains::{DomainError, KeyValueStore, Profile, ProfileRepository, Result, WalletAddress, WriteOp};
use tracing::{debug, info, warn};

use crate::error::StorageError;

pub const PROFILE_KEY_PREFIX: &str = "profile-";
pub const USERNAME_KEY_PREFIX: &str = "username-";

pub fn profile_key(address: &WalletAddress) -> String {
    format!("{PROFILE_KEY_PREFIX}{address}")
}

pub fn username_key(username: &str) -> String {
    format!("{USERNAME_KEY_PREFIX}{username}")
}

/// Profiles under `profile-<address>`, with a `username-<username>` index.
pub struct KvProfileRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvProfileRepository {
    /// Wraps `store` and backfills index entries missing for stored profiles.
    ///
    /// Records written by older clients carry no index. When two records
    /// share a username the earliest created keeps it.
    pub async fn open(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let repo = Self { store };
        let mut profiles = repo.list().await?;
        profiles.sort_by_key(|p| p.created_at);

        let mut batch = Vec::new();
        let mut claimed = std::collections::HashSet::new();
        for profile in &profiles {
            if !claimed.insert(profile.username.clone()) {
                warn!(address = %profile.address, username = %profile.username, "duplicate username left unindexed");
                continue;
            }
            // missing or pointing at a record that no longer carries the name
            if repo.username_owner(&profile.username).await?.is_none() {
                batch.push(WriteOp::put(username_key(&profile.username), profile.address.as_str()));
            }
        }
        if !batch.is_empty() {
            info!(entries = batch.len(), "rebuilt username index");
            repo.store.apply(batch).await?;
        }
        Ok(repo)
    }

    /// Decodes a stored record. Unreadable records are treated as absent.
    fn decode(key: &str, raw: &str) -> Option<Profile> {
        match serde_json::from_str::<Profile>(raw) {
            Ok(mut profile) => {
                if profile.address.is_empty() {
                    let from_key = key.strip_prefix(PROFILE_KEY_PREFIX).unwrap_or(key);
                    profile.address = WalletAddress::parse(from_key).ok()?;
                }
                Some(profile)
            }
            Err(e) => {
                warn!(key, error = %e, "skipping malformed profile record");
                None
            }
        }
    }

    /// Raw index entry. May point at a record that has since been renamed.
    async fn indexed_owner(&self, username: &str) -> Result<Option<WalletAddress>> {
        let owner = self
            .store
            .get(&username_key(username))
            .await?
            .and_then(|raw| WalletAddress::parse(&raw).ok());
        if let Some(owner) = &owner {
            debug!(username, %owner, "username index hit");
        }
        Ok(owner)
    }

    fn encode(profile: &Profile) -> Result<String> {
        serde_json::to_string(profile).map_err(|e| StorageError::from(e).into())
    }
}

#[async_trait]
impl ProfileRepository for KvProfileRepository {
    async fn find(&self, address: &WalletAddress) -> Result<Option<Profile>> {
        let key = profile_key(address);
        Ok(self
            .store
            .get(&key)
            .await?
            .and_then(|raw| Self::decode(&key, &raw)))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Profile>> {
        match self.indexed_owner(username).await? {
            Some(owner) => Ok(self.find(&owner).await?.filter(|p| p.username == username)),
            None => Ok(None),
        }
    }

    async fn username_owner(&self, username: &str) -> Result<Option<WalletAddress>> {
        Ok(self.find_by_username(username).await?.map(|p| p.address))
    }

    async fn list(&self) -> Result<Vec<Profile>> {
        let mut out = Vec::new();
        for key in self.store.keys_with_prefix(PROFILE_KEY_PREFIX).await? {
            if let Some(raw) = self.store.get(&key).await? {
                if let Some(profile) = Self::decode(&key, &raw) {
                    out.push(profile);
                }
            }
        }
        Ok(out)
    }

    async fn insert(&self, profile: &Profile) -> Result<()> {
        if let Some(owner) = self.username_owner(&profile.username).await? {
            if owner != profile.address {
                return Err(DomainError::Conflict(format!(
                    "username '{}' is held by {owner}",
                    profile.username
                )));
            }
        }
        self.store
            .apply(vec![
                WriteOp::put(profile_key(&profile.address), Self::encode(profile)?),
                WriteOp::put(username_key(&profile.username), profile.address.as_str()),
            ])
            .await
    }

    async fn update(&self, before: &Profile, after: &Profile) -> Result<()> {
        let mut batch = vec![WriteOp::put(profile_key(&after.address), Self::encode(after)?)];
        if before.username != after.username {
            if let Some(owner) = self.username_owner(&after.username).await? {
                if owner != after.address {
                    return Err(DomainError::Conflict(format!(
                        "username '{}' is held by {owner}",
                        after.username
                    )));
                }
            }
            // an unindexed duplicate must not release the holder's entry
            if self.indexed_owner(&before.username).await?.as_ref() == Some(&before.address) {
                batch.push(WriteOp::delete(username_key(&before.username)));
            }
            batch.push(WriteOp::put(username_key(&after.username), after.address.as_str()));
        }
        self.store.apply(batch).await
    }

    async fn save_pair(&self, first: &Profile, second: &Profile) -> Result<()> {
        self.store
            .apply(vec![
                WriteOp::put(profile_key(&first.address), Self::encode(first)?),
                WriteOp::put(profile_key(&second.address), Self::encode(second)?),
            ])
            .await
    }
}
