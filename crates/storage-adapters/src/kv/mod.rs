//! Key/value media backing the repositories.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
