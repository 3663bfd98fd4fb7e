//! Command handlers for the pocket CLI.
//!
//! This module contains implementations for all CLI subcommands. Each handler loads what it
//! needs from the `Config`, does its work, waits for any pending ledger writes, and returns an
//! `Out` describing the result.

mod add;
mod budget;
mod delete;
mod list;
mod prefs;
mod summary;

use crate::ledger::Ledger;
use crate::model::format_amount;
use crate::prefs::Language;
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, info};

pub use add::add;
pub use budget::{budget, new_budget};
pub use delete::delete;
pub use list::list;
pub use prefs::{language, theme};
pub use summary::{summary, Summary};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// The opened ledger plus the display settings that go with it.
struct Session {
    ledger: Ledger,
    language: Language,
    currency: String,
}

impl Session {
    async fn open(config: &Config) -> Result<Self> {
        let store = Arc::new(config.store().await?);
        let language = crate::prefs::language(store.as_ref()).await;
        let ledger = Ledger::initialize(store).await;
        Ok(Self {
            ledger,
            language,
            currency: config.currency_symbol().to_string(),
        })
    }

    /// `value` with group separators and the currency symbol, e.g. `1.200.000đ`.
    fn money(&self, value: i64) -> String {
        format!("{}{}", format_amount(value, self.language), self.currency)
    }

    /// `money` with an explicit sign, `+` for zero and above.
    fn signed_money(&self, value: i64) -> String {
        if value < 0 {
            self.money(value)
        } else {
            format!("+{}", self.money(value))
        }
    }
}
