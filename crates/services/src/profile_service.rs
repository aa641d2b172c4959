//! # Profile Record Store
//!
//! Create, edit, mint and the two-sided follow mutation. Every
//! read-modify-write unit runs under one write lock so that no two mutations
//! interleave inside a process.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use domains::{
    CoreAmount, DomainError, MintFailure, MintGateway, MintOutcome, MintRequest, NewProfile,
    Profile, ProfileRepository, ProfileUpdate, Result, UsernameStatus, WalletAddress,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::username;

/// Bounds applied to every mint request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintPolicy {
    /// Upper bound on one gateway call
    pub timeout: Duration,
    pub min_price: CoreAmount,
    pub max_price: CoreAmount,
}

impl Default for MintPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            min_price: CoreAmount::from_wei(10_000_000_000_000_000), // 0.01 CORE
            max_price: CoreAmount::from_wei(10_000_000_000_000_000_000), // 10 CORE
        }
    }
}

pub struct ProfileService {
    repo: Arc<dyn ProfileRepository>,
    minter: Arc<dyn MintGateway>,
    policy: MintPolicy,
    write_lock: Mutex<()>,
}

impl ProfileService {
    pub fn new(repo: Arc<dyn ProfileRepository>, minter: Arc<dyn MintGateway>, policy: MintPolicy) -> Self {
        Self {
            repo,
            minter,
            policy,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn get(&self, address: &WalletAddress) -> Result<Option<Profile>> {
        self.repo.find(address).await
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<Profile>> {
        self.repo.find_by_username(username).await
    }

    /// Evaluates every username rule.
    ///
    /// A username already held by `for_address` counts as available, so an
    /// owner can resubmit their own name while editing.
    pub async fn check_username(
        &self,
        candidate: &str,
        for_address: Option<&WalletAddress>,
    ) -> Result<UsernameStatus> {
        let status = username::check_format(candidate);
        if !status.is_available() {
            return Ok(status);
        }
        let owner = self.repo.username_owner(candidate).await?;
        Ok(match owner {
            Some(owner) if Some(&owner) != for_address => UsernameStatus::Taken,
            _ => UsernameStatus::Available,
        })
    }

    pub async fn create(&self, address: &WalletAddress, fields: NewProfile) -> Result<Profile> {
        let _guard = self.write_lock.lock().await;

        if fields.name.trim().is_empty() {
            return Err(DomainError::Validation("name is required".into()));
        }
        if self.repo.find(address).await?.is_some() {
            return Err(DomainError::Conflict(format!("{address} already has a profile")));
        }
        let status = self.check_username(&fields.username, None).await?;
        if !status.is_available() {
            debug!(%address, username = %fields.username, ?status, "username rejected");
            return Err(DomainError::Username(status));
        }

        let profile = Profile::new(address.clone(), fields, Utc::now());
        self.repo.insert(&profile).await?;
        info!(%address, username = %profile.username, "profile created");
        Ok(profile)
    }

    pub async fn update(&self, address: &WalletAddress, update: ProfileUpdate) -> Result<Profile> {
        let _guard = self.write_lock.lock().await;

        let current = self.require(address).await?;
        if current.nft_minted {
            return Err(DomainError::ProfileLocked(address.clone()));
        }
        if update.is_empty() {
            return Ok(current);
        }
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(DomainError::Validation("name is required".into()));
            }
        }
        if let Some(candidate) = &update.username {
            if *candidate != current.username {
                let status = self.check_username(candidate, Some(address)).await?;
                if !status.is_available() {
                    return Err(DomainError::Username(status));
                }
            }
        }

        let mut next = current.clone();
        next.apply(update);
        self.repo.update(&current, &next).await?;
        info!(%address, "profile updated");
        Ok(next)
    }

    /// Mints the profile NFT, freezing the profile on success.
    ///
    /// Minting an already minted profile returns it unchanged. The gateway
    /// call runs outside the write lock; the record is re-read before the
    /// flag is written.
    pub async fn mint(&self, address: &WalletAddress, price: CoreAmount) -> Result<Profile> {
        if price < self.policy.min_price || price > self.policy.max_price {
            return Err(DomainError::Validation(format!(
                "mint price must be between {} and {} CORE",
                self.policy.min_price, self.policy.max_price
            )));
        }

        let request = {
            let _guard = self.write_lock.lock().await;
            let current = self.require(address).await?;
            if current.nft_minted {
                debug!(%address, "profile already minted");
                return Ok(current);
            }
            MintRequest {
                address: address.clone(),
                name: current.name,
                username: current.username,
                price,
            }
        };

        let outcome = match tokio::time::timeout(self.policy.timeout, self.minter.mint(&request)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                let after_ms = self.policy.timeout.as_millis() as u64;
                warn!(%address, after_ms, "mint timed out");
                return Err(DomainError::MintFailed(MintFailure::TimedOut { after_ms }));
            }
        };

        let failure = match outcome {
            MintOutcome::Minted { token_id } => {
                let _guard = self.write_lock.lock().await;
                let current = self.require(address).await?;
                if current.nft_minted {
                    debug!(%address, "profile minted concurrently");
                    return Ok(current);
                }
                let mut next = current.clone();
                next.nft_minted = true;
                self.repo.update(&current, &next).await?;
                info!(%address, token_id = token_id.as_deref().unwrap_or("-"), %price, "profile minted");
                return Ok(next);
            }
            MintOutcome::UserRejected => MintFailure::UserRejected,
            MintOutcome::InsufficientFunds => MintFailure::InsufficientFunds,
            MintOutcome::ChainError(reason) => MintFailure::ChainError(reason),
        };
        warn!(%address, %failure, "mint failed");
        Err(DomainError::MintFailed(failure))
    }

    /// Makes `follower` follow `target`. Returns both updated records.
    pub async fn follow(&self, follower: &WalletAddress, target: &WalletAddress) -> Result<(Profile, Profile)> {
        self.mutate_edge(follower, target, true).await
    }

    pub async fn unfollow(&self, follower: &WalletAddress, target: &WalletAddress) -> Result<(Profile, Profile)> {
        self.mutate_edge(follower, target, false).await
    }

    /// Read both, validate, write both as one batch.
    async fn mutate_edge(
        &self,
        follower: &WalletAddress,
        target: &WalletAddress,
        follow: bool,
    ) -> Result<(Profile, Profile)> {
        if follower == target {
            return Err(DomainError::SelfFollow);
        }
        let _guard = self.write_lock.lock().await;

        let mut from = self.require(follower).await?;
        let mut to = self.require(target).await?;
        let changed = if follow {
            from.follow(&mut to)
        } else {
            from.unfollow(&mut to)
        };
        if !changed {
            debug!(%follower, %target, follow, "social graph unchanged");
            return Ok((from, to));
        }

        self.repo.save_pair(&from, &to).await?;
        info!(%follower, %target, follow, "social graph updated");
        Ok((from, to))
    }

    /// Profiles with a name and username, ordered by username.
    pub async fn discover(&self) -> Result<Vec<Profile>> {
        let mut profiles: Vec<Profile> = self
            .repo
            .list()
            .await?
            .into_iter()
            .filter(|p| !p.name.is_empty() && !p.username.is_empty())
            .collect();
        profiles.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(profiles)
    }

    pub async fn followers_of(&self, username: &str) -> Result<Vec<Profile>> {
        let profile = self.require_username(username).await?;
        self.resolve(&profile.followers).await
    }

    pub async fn following_of(&self, username: &str) -> Result<Vec<Profile>> {
        let profile = self.require_username(username).await?;
        self.resolve(&profile.following).await
    }

    /// Addresses without a record are skipped.
    async fn resolve(&self, addresses: &[WalletAddress]) -> Result<Vec<Profile>> {
        let mut out = Vec::with_capacity(addresses.len());
        for address in addresses {
            match self.repo.find(address).await? {
                Some(profile) => out.push(profile),
                None => debug!(%address, "skipping address without profile"),
            }
        }
        Ok(out)
    }

    async fn require(&self, address: &WalletAddress) -> Result<Profile> {
        self.repo
            .find(address)
            .await?
            .ok_or_else(|| DomainError::not_found("Profile", address))
    }

    async fn require_username(&self, username: &str) -> Result<Profile> {
        self.repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("Profile", username))
    }
}
