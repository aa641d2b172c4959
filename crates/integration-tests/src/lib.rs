//! Shared fixtures: the real services wired over an in-process store.

use std::sync::Arc;
use std::time::Duration;

use domains::{
    CoreAmount, KeyValueStore, MintGateway, NewPost, NewProfile, PostKind, Profile, WalletAddress,
};
use services::{MintPolicy, PostService, ProfileService, SessionGuard};
use storage_adapters::{KvPostRepository, KvProfileRepository, MemoryStore, SimulatedMinter};

pub struct Harness {
    pub store: Arc<dyn KeyValueStore>,
    pub profiles: ProfileService,
    pub posts: PostService,
    pub guard: SessionGuard,
}

impl Harness {
    pub async fn new() -> anyhow::Result<Self> {
        Self::over(Arc::new(MemoryStore::new())).await
    }

    pub async fn over(store: Arc<dyn KeyValueStore>) -> anyhow::Result<Self> {
        Self::with_minter(store, Arc::new(SimulatedMinter::new(Duration::ZERO))).await
    }

    pub async fn with_minter(store: Arc<dyn KeyValueStore>, minter: Arc<dyn MintGateway>) -> anyhow::Result<Self> {
        let profile_repo = Arc::new(KvProfileRepository::open(store.clone()).await?);
        let post_repo = Arc::new(KvPostRepository::open(store.clone()).await?);
        Ok(Self {
            store,
            profiles: ProfileService::new(profile_repo.clone(), minter, MintPolicy::default()),
            posts: PostService::new(post_repo, profile_repo.clone()),
            guard: SessionGuard::new(profile_repo),
        })
    }

    /// Creates a profile named after its username.
    pub async fn profile(&self, address: &str, username: &str) -> anyhow::Result<Profile> {
        let fields = NewProfile {
            name: capitalize(username),
            username: username.to_string(),
            ..Default::default()
        };
        Ok(self.profiles.create(&addr(address), fields).await?)
    }

    /// Creates and mints a profile, which makes it eligible to post.
    pub async fn minted(&self, address: &str, username: &str) -> anyhow::Result<Profile> {
        self.profile(address, username).await?;
        Ok(self.profiles.mint(&addr(address), min_price()).await?)
    }

    pub async fn post(&self, address: &str, content: &str) -> anyhow::Result<domains::Post> {
        let fields = NewPost {
            kind: PostKind::Normal,
            content: content.to_string(),
            media: None,
        };
        Ok(self.posts.create(&addr(address), fields).await?)
    }
}

pub fn addr(raw: &str) -> WalletAddress {
    WalletAddress::parse(raw).unwrap_or_default()
}

pub fn min_price() -> CoreAmount {
    MintPolicy::default().min_price
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
