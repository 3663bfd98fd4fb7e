//! Configuration file handling for Pocket.
//!
//! The configuration file is stored at `$POCKET_HOME/config.json` and contains the currency symbol
//! used when printing amounts and, optionally, the location of the key-value store.

use crate::store::FileStore;
use crate::{utils, Result};
use anyhow::{bail, ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

const APP_NAME: &str = "pocket";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const STORE_DIR: &str = "store";
const DEFAULT_CURRENCY_SYMBOL: &str = "đ";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$POCKET_HOME` and from there it loads `$POCKET_HOME/config.json`. It provides the
/// paths of the other items that live in the home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    store_dir: PathBuf,
}

impl Config {
    /// Loads the configuration from `home`. On first use this creates the home directory and writes
    /// a default `config.json` into it.
    pub async fn load_or_create(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the pocket home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.exists() {
            info!("Creating {}", config_path.display());
            ConfigFile::default().save(&config_path).await?;
        }
        Self::load(root).await
    }

    /// Loads an existing configuration. Fails if the home directory or its `config.json` is
    /// missing.
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Pocket home is missing")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let store_dir = match &config_file.store_dir {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => root.join(p),
            None => root.join(STORE_DIR),
        };

        Ok(Self {
            root,
            config_path,
            config_file,
            store_dir,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The directory that holds the key-value store files.
    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    pub fn currency_symbol(&self) -> &str {
        &self.config_file.currency_symbol
    }

    /// Opens the file-backed key-value store, creating its directory if needed.
    pub async fn store(&self) -> Result<FileStore> {
        FileStore::new(&self.store_dir).await
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "pocket",
///   "config_version": 1,
///   "currency_symbol": "đ",
///   "store_dir": "store"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "pocket"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Printed after every amount
    #[serde(default = "default_currency_symbol")]
    currency_symbol: String,

    /// Where the key-value store lives (optional, relative to the home directory or absolute)
    /// Defaults to $POCKET_HOME/store if not specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    store_dir: Option<PathBuf>,
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            currency_symbol: default_currency_symbol(),
            store_dir: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path)
            .await
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        ensure!(
            config.config_version <= CONFIG_VERSION,
            "Config file version {} is newer than this program supports ({})",
            config.config_version,
            CONFIG_VERSION
        );

        Ok(config)
    }

    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
