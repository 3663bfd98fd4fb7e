//! Implements the `KeyValueStore` trait in memory.
//!
//! Note: this is compiled even in the "production" version of this app so that the ledger can run
//! without touching the filesystem.

use crate::store::KeyValueStore;
use crate::Result;
use anyhow::bail;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// An implementation of `KeyValueStore` that holds its data in a map. Clones share the same data,
/// so a test can keep a handle to a store that it has given to a `Ledger`.
///
/// Reads and writes can be made to fail, which is how persistence failures are simulated.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    data: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `data`.
    pub fn with_data<K, V>(data: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        store.lock().data = data
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        store
    }

    /// When `fail` is true, every `get` returns an error.
    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// When `fail` is true, every `set` returns an error and leaves the data unchanged.
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// The number of successful `set` calls so far.
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    /// The current value under `key`, bypassing the failure switches.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.lock().data.get(key).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let inner = self.lock();
        if inner.fail_reads {
            bail!("Simulated read failure for '{key}'");
        }
        Ok(inner.data.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_writes {
            bail!("Simulated write failure for '{key}'");
        }
        inner.data.insert(key.to_string(), value);
        inner.writes += 1;
        Ok(())
    }
}
