//! Storage layer: the ordered key-value store the account runs on

pub mod persistence;
pub mod store;

pub use persistence::{FileStore, StorageConfig, StorageError};
pub use store::{KvStore, MemoryStore, Overlay, WriteOp};
