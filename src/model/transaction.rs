use crate::model::{Amount, Category};
use crate::prefs::Language;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Whether a transaction brings money in or takes it out.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

impl TransactionType {
    /// `+` for income and `-` for expense.
    pub fn sign(&self) -> char {
        match self {
            TransactionType::Income => '+',
            TransactionType::Expense => '-',
        }
    }

    pub fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (TransactionType::Income, Language::En) => "Income",
            (TransactionType::Expense, Language::En) => "Expense",
            (TransactionType::Income, Language::Vi) => "Thu nhập",
            (TransactionType::Expense, Language::Vi) => "Chi tiêu",
        }
    }
}

/// The identifier of a transaction. Newly created identifiers are the creation time in
/// milliseconds since the Unix epoch, but any string read back from storage is accepted.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub(crate) fn from_millis(millis: i64) -> Self {
        Self(millis.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The creation timestamp encoded in the identifier, if it is one of ours.
    pub(crate) fn millis(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A transaction before it has been given an identifier. This is what callers hand to
/// `Ledger::add`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Draft {
    pub kind: TransactionType,
    pub amount: Amount,
    pub note: String,
    pub date: NaiveDate,
    pub category: Option<Category>,
}

impl Draft {
    /// Creates a draft with an empty note and no category.
    pub fn new(kind: TransactionType, amount: Amount, date: NaiveDate) -> Self {
        Self {
            kind,
            amount,
            note: String::new(),
            date,
            category: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<Option<Category>>) -> Self {
        self.category = category.into();
        self
    }
}

/// One recorded money movement.
///
/// Serialized as:
/// ```json
/// {"id": "1760700000000", "type": "expense", "amount": 450000, "note": "Grocery",
///  "date": "2025-10-18", "category": "foods"}
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    #[serde(rename = "type")]
    kind: TransactionType,
    amount: Amount,
    #[serde(default)]
    note: String,
    #[serde(with = "iso_date")]
    date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<Category>,
}

impl Transaction {
    pub(crate) fn from_draft(id: TransactionId, draft: Draft) -> Self {
        Self {
            id,
            kind: draft.kind,
            amount: draft.amount,
            note: draft.note,
            date: draft.date,
            category: draft.category,
        }
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

/// Dates are written as `YYYY-MM-DD`. Older documents hold full timestamps such as
/// `2025-10-17T05:00:00.000Z`; those are read as the local calendar date of that instant.
mod iso_date {
    use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub(super) fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| serde::de::Error::custom(format!("'{s}' is not an ISO-8601 date")))
    }

    fn parse(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, FORMAT) {
            return Some(date);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Local).date_naive());
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|dt| dt.date())
    }
}
