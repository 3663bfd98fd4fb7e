//! Narrows a list of transactions down to the ones the user asked to see.

use crate::model::{Category, Transaction, TransactionType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which transaction types pass a filter.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeFilter {
    #[default]
    All,
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(TypeFilter);
serde_plain::derive_fromstr_from_deserialize!(TypeFilter);

impl TypeFilter {
    pub fn matches(&self, kind: TransactionType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Income => kind == TransactionType::Income,
            TypeFilter::Expense => kind == TransactionType::Expense,
        }
    }
}

impl From<TransactionType> for TypeFilter {
    fn from(kind: TransactionType) -> Self {
        match kind {
            TransactionType::Income => TypeFilter::Income,
            TransactionType::Expense => TypeFilter::Expense,
        }
    }
}

/// The criteria chosen in the filter panel. The default value lets every transaction through.
///
/// Both date bounds are inclusive. An empty `categories` set means no restriction, and a
/// transaction without a category never matches a non-empty set.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub categories: BTreeSet<Category>,
    #[serde(rename = "type")]
    pub kind: TypeFilter,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matches(&self, t: &Transaction) -> bool {
        if self.start_date.is_some_and(|start| t.date() < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| t.date() > end) {
            return false;
        }
        if !self.categories.is_empty() {
            match t.category() {
                Some(category) if self.categories.contains(&category) => {}
                _ => return false,
            }
        }
        self.kind.matches(t.kind())
    }

    /// The matching transactions, in the same relative order as `transactions`.
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions.iter().filter(|t| self.matches(t)).collect()
    }

    /// Adds `category` to the set if it is absent, otherwise removes it.
    pub fn toggle_category(&mut self, category: Category) {
        if !self.categories.remove(&category) {
            self.categories.insert(category);
        }
    }

    /// Resets every criterion.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when the filter lets every transaction through.
    pub fn is_unrestricted(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.categories.is_empty()
            && self.kind == TypeFilter::All
    }
}
