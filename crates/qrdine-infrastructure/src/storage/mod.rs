//! Storage layer: key-value backends and the persistence adapter.

mod adapter;
mod atomic_file;
mod json_file_store;
mod memory_store;
mod unavailable_store;

pub use adapter::StorageAdapter;
pub use atomic_file::{FileLock, read_optional, write_atomic};
pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use unavailable_store::UnavailableStore;
