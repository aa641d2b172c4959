//! # DomainError
//!
//! Centralized error handling for the Swish data layer.
//! Every failure leaves the stored state as it was before the call.

use thiserror::Error;

use crate::models::{UsernameStatus, WalletAddress};
use crate::ports::MintFailure;

/// The primary error type for all domain and service operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Entity not found (e.g., Profile, Post, Comment)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., blank content, bad amount)
    #[error("validation error: {0}")]
    Validation(String),

    /// Username failed the availability rules
    #[error("username rejected: {0}")]
    Username(UsernameStatus),

    /// Resource already exists (e.g., second profile for one address)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Edit attempted on a minted profile
    #[error("profile {0} is minted and can no longer be edited")]
    ProfileLocked(WalletAddress),

    #[error("an address cannot follow itself")]
    SelfFollow,

    /// Precondition on the caller not met (e.g., posting without a minted profile)
    #[error("not eligible: {0}")]
    NotEligible(String),

    #[error("mint failed: {0}")]
    MintFailed(MintFailure),

    #[error("wallet error: {0}")]
    Wallet(#[from] WalletError),

    /// Connected to no chain or the wrong one
    #[error("{0}")]
    WrongNetwork(String),

    /// Infrastructure failure in the key/value medium
    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        DomainError::NotFound(entity.to_string(), id.to_string())
    }
}

/// Failures reported by the wallet collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("request rejected by the user")]
    Rejected,

    #[error("no wallet available: {0}")]
    Unavailable(String),

    /// The wallet does not know the requested chain and it must be added first
    #[error("chain {0} is not configured in the wallet")]
    UnknownChain(u64),

    #[error("transaction failed: {0}")]
    Transaction(String),
}

/// A specialized Result type for Swish logic.
pub type Result<T> = std::result::Result<T, DomainError>;
