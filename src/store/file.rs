//! Implements the `KeyValueStore` trait with one JSON file per key.

use crate::store::KeyValueStore;
use crate::{utils, Result};
use anyhow::{ensure, Context};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a uniquely named temp file in the same directory which is then renamed over the
/// target, so a reader sees either the previous value or the new one and never a partial write.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    seq: AtomicU64,
}

impl FileStore {
    /// Creates the store directory if it does not exist.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        utils::make_dir(&dir)
            .await
            .context("Unable to create the store directory")?;
        Ok(Self {
            dir,
            seq: AtomicU64::new(0),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file that holds `key`. Keys are limited to ASCII alphanumerics, `_` and `-` so that
    /// they cannot escape the store directory.
    fn path(&self, key: &str) -> Result<PathBuf> {
        ensure!(
            !key.is_empty()
                && key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
            "Invalid store key '{key}'"
        );
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait::async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key)?;
        trace!("get {key} from {}", path.display());
        utils::read_optional(&path).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let path = self.path(key)?;
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let temp = self
            .dir
            .join(format!(".{key}.{}.{seq}.tmp", std::process::id()));
        trace!("set {key} via {}", temp.display());

        utils::write(&temp, value).await?;
        if let Err(e) = utils::rename(&temp, &path).await {
            let _ = utils::remove(&temp).await;
            return Err(e);
        }
        Ok(())
    }
}
