//! swish/crates/domains/src/lib.rs
//!
//! Entities, error taxonomy and port traits for the Swish social data layer.
//! Nothing in this crate performs I/O; adapters live in `storage-adapters`.

pub mod error;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use ports::*;
