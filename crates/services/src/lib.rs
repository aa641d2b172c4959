//! swish/crates/services/src/lib.rs
//!
//! Application services over the `domains` ports: the profile record store,
//! the post store, the navigation guard, network policy and tipping.
//! Front ends hold these behind `Arc` and receive owned snapshots back.

pub mod network;
pub mod post_service;
pub mod profile_service;
pub mod session_guard;
pub mod tipping;
pub mod username;

pub use network::NetworkPolicy;
pub use post_service::PostService;
pub use profile_service::{MintPolicy, ProfileService};
pub use session_guard::SessionGuard;
pub use tipping::TipService;
