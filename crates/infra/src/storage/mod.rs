//! Key/value backends for the two token storage scopes

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
