use std::fmt;

use serde::{Deserialize, Serialize};

use super::WalletAddress;

/// First path segments owned by the application. Profiles live at
/// `/<username>`, so none of these may be taken as a username.
pub const RESERVED_USERNAMES: [&str; 7] = [
    "home",
    "create-profile",
    "profile",
    "admin",
    "login",
    "create-post",
    "discover",
];

/// Connection state reported by the wallet collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WalletStatus {
    Disconnected,
    Connected {
        address: WalletAddress,
        /// `None` when the wallet has not reported a chain yet
        chain_id: Option<u64>,
    },
}

impl WalletStatus {
    pub fn address(&self) -> Option<&WalletAddress> {
        match self {
            WalletStatus::Disconnected => None,
            WalletStatus::Connected { address, .. } => Some(address),
        }
    }

    pub fn chain_id(&self) -> Option<u64> {
        match self {
            WalletStatus::Disconnected => None,
            WalletStatus::Connected { chain_id, .. } => *chain_id,
        }
    }
}

/// Application screens addressed by path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Home,
    CreateProfile,
    CreatePost,
    Discover,
    /// The connected user's own profile editor
    OwnProfile,
    PublicProfile(String),
    Followers(String),
    Following(String),
    /// Reserved or unrecognised paths (e.g. `/admin`)
    Unknown(String),
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Landing,
            ["home"] => Route::Home,
            ["create-profile"] => Route::CreateProfile,
            ["create-post"] => Route::CreatePost,
            ["discover"] => Route::Discover,
            ["profile"] => Route::OwnProfile,
            [first, ..] if RESERVED_USERNAMES.contains(first) => Route::Unknown(path.to_string()),
            [username] => Route::PublicProfile((*username).to_string()),
            [username, "followers"] => Route::Followers((*username).to_string()),
            [username, "following"] => Route::Following((*username).to_string()),
            _ => Route::Unknown(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Home => "/home".to_string(),
            Route::CreateProfile => "/create-profile".to_string(),
            Route::CreatePost => "/create-post".to_string(),
            Route::Discover => "/discover".to_string(),
            Route::OwnProfile => "/profile".to_string(),
            Route::PublicProfile(u) => format!("/{u}"),
            Route::Followers(u) => format!("/{u}/followers"),
            Route::Following(u) => format!("/{u}/following"),
            Route::Unknown(p) => p.clone(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Result of a navigation guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Redirect(Route),
}
