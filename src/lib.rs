//! A local-first personal finance tracker.
//!
//! The [`Ledger`] holds the recorded transactions in memory, derives the income, expense and
//! balance aggregates, and writes the whole collection to a [`KeyValueStore`] after every
//! mutation. [`FilterSpec`] narrows a list of transactions down to what the user asked to see.

pub mod args;
pub mod commands;
mod config;
mod error;
pub mod filter;
pub mod ledger;
pub mod model;
pub mod prefs;
pub mod store;
mod utils;


pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use filter::{FilterSpec, TypeFilter};
pub use ledger::Ledger;
pub use store::{FileStore, KeyValueStore, MemoryStore};
