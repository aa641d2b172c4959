//! # Session/Navigation Guard
//!
//! Derives where a session belongs from the wallet status and the presence of
//! a profile record. Reads only; re-running it on the same inputs yields the
//! same decision.

use std::sync::Arc;

use domains::{Navigation, ProfileRepository, Result, Route, WalletAddress, WalletStatus};
use tracing::debug;

/// The three session states the guard distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    ConnectedNoProfile(WalletAddress),
    ConnectedWithProfile(WalletAddress),
}

pub struct SessionGuard {
    profiles: Arc<dyn ProfileRepository>,
}

impl SessionGuard {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    pub async fn state(&self, wallet: &WalletStatus) -> Result<SessionState> {
        let Some(address) = wallet.address() else {
            return Ok(SessionState::Disconnected);
        };
        // unreadable records already come back as `None`
        let state = match self.profiles.find(address).await? {
            Some(_) => SessionState::ConnectedWithProfile(address.clone()),
            None => SessionState::ConnectedNoProfile(address.clone()),
        };
        Ok(state)
    }

    /// Decides whether the session on `current` must move elsewhere.
    pub async fn evaluate(&self, wallet: &WalletStatus, current: &Route) -> Result<Navigation> {
        let state = self.state(wallet).await?;
        let decision = decide(&state, current);
        debug!(?state, %current, ?decision, "navigation evaluated");
        Ok(decision)
    }
}

/// Pure transition table.
pub fn decide(state: &SessionState, current: &Route) -> Navigation {
    let target = match state {
        SessionState::Disconnected => Route::Landing,
        SessionState::ConnectedNoProfile(_) => Route::CreateProfile,
        SessionState::ConnectedWithProfile(_) => match current {
            Route::CreateProfile | Route::Landing => Route::Home,
            _ => return Navigation::Stay,
        },
    };
    if *current == target {
        Navigation::Stay
    } else {
        Navigation::Redirect(target)
    }
}
