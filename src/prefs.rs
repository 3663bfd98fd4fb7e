//! Language and theme preferences, kept in the same key-value store as the ledger.

use crate::store::KeyValueStore;
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, warn};

/// Store key for the selected language.
pub const LANGUAGE_KEY: &str = "app_language";

/// Store key for the selected theme.
pub const THEME_KEY: &str = "app_theme";

/// The languages the app has labels for.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    En,
    Vi,
}

serde_plain::derive_display_from_serialize!(Language);
serde_plain::derive_fromstr_from_deserialize!(Language);

impl Language {
    /// Picks a language from a POSIX locale string such as `vi_VN.UTF-8` or `en-US`. Returns
    /// `None` when the primary subtag is not one we have labels for.
    pub fn from_locale(locale: &str) -> Option<Self> {
        let primary = locale
            .split(['_', '-', '.', '@'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        Language::from_str(&primary).ok()
    }

    /// The language of the system locale, if it is supported.
    pub fn from_env() -> Option<Self> {
        ["LC_ALL", "LANG"]
            .into_iter()
            .filter_map(|var| std::env::var(var).ok())
            .find_map(|locale| Language::from_locale(&locale))
    }
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

serde_plain::derive_display_from_serialize!(Theme);
serde_plain::derive_fromstr_from_deserialize!(Theme);

/// Reads the stored language. Falls back to the system locale and then to English. Unknown stored
/// values are ignored.
pub async fn language(store: &dyn KeyValueStore) -> Language {
    match load::<Language>(store, LANGUAGE_KEY).await {
        Some(language) => language,
        None => {
            let language = Language::from_env().unwrap_or_default();
            debug!("No stored language, using {language}");
            language
        }
    }
}

pub async fn set_language(store: &dyn KeyValueStore, language: Language) -> Result<()> {
    store
        .set(LANGUAGE_KEY, language.to_string())
        .await
        .context("Unable to save the language preference")
}

/// Reads the stored theme, defaulting to light.
pub async fn theme(store: &dyn KeyValueStore) -> Theme {
    load::<Theme>(store, THEME_KEY).await.unwrap_or_default()
}

pub async fn set_theme(store: &dyn KeyValueStore, theme: Theme) -> Result<()> {
    store
        .set(THEME_KEY, theme.to_string())
        .await
        .context("Unable to save the theme preference")
}

async fn load<T>(store: &dyn KeyValueStore, key: &str) -> Option<T>
where
    T: FromStr,
{
    match store.get(key).await {
        Ok(Some(s)) => match T::from_str(s.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring unrecognized value '{s}' stored under {key}");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!("Unable to read {key}: {e:#}");
            None
        }
    }
}
