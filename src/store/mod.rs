//! The key-value storage that the ledger and preferences are persisted to.
//!
//! Values are opaque strings stored under fixed keys. `FileStore` keeps them on disk and
//! `MemoryStore` keeps them in memory for tests and session-only use.

mod file;
mod memory;

use crate::Result;

pub use file::FileStore;
pub use memory::MemoryStore;

/// A very simple asynchronous key-value store.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `key`, or `None` if nothing has been stored there.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<()>;
}
