//! Amount type for handling the non-negative money magnitudes stored on transactions.
//!
//! Amounts are whole numbers in the smallest display unit; there is no currency subdivision. The
//! sign of a transaction comes from its type, so an `Amount` is never negative.

use crate::prefs::Language;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// The largest amount that can be stored. Ledger documents are plain JSON numbers, and this is the
/// largest integer that every JSON reader can represent exactly.
pub const MAX_AMOUNT: u64 = 9_007_199_254_740_991;

/// A non-negative amount of money.
///
/// # Examples
///
/// Parsing keypad-style input:
/// ```
/// # use pocket_ledger::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("1.200.000").unwrap();
/// assert_eq!(amount.value(), 1_200_000);
/// ```
///
/// Zero is a valid amount, it is the entry screen that refuses it:
/// ```
/// # use pocket_ledger::model::Amount;
/// # use std::str::FromStr;
/// assert!(Amount::from_str("0").unwrap().is_zero());
/// assert!(Amount::from_str("-5").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(pub(super) u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates an `Amount`, failing if `value` is larger than `MAX_AMOUNT`.
    pub fn new(value: u64) -> Result<Self, AmountError> {
        if value > MAX_AMOUNT {
            return Err(AmountError::TooLarge(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Formats the amount with the thousands separator used by `language`.
    pub fn format(&self, language: Language) -> String {
        format_amount(self.0 as i64, language)
    }
}

/// An error that can occur when parsing or constructing an `Amount`.
#[derive(Clone, PartialEq, Eq)]
pub enum AmountError {
    /// The input had no digits.
    Empty,
    /// The input had something other than digits and group separators.
    Invalid(String),
    /// The value is larger than `MAX_AMOUNT`.
    TooLarge(u64),
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => write!(f, "The amount is empty"),
            AmountError::Invalid(s) => write!(f, "'{s}' is not a valid amount"),
            AmountError::TooLarge(v) => {
                write!(f, "The amount {v} is larger than the maximum of {MAX_AMOUNT}")
            }
        }
    }
}

impl std::error::Error for AmountError {}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parses digits, allowing `.`, `,` and `_` as thousands separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits: String = trimmed
            .chars()
            .filter(|c| !matches!(c, '.' | ',' | '_'))
            .collect();

        if digits.is_empty() {
            return Err(AmountError::Empty);
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(AmountError::Invalid(trimmed.to_string()));
        }

        let value = digits
            .parse::<u64>()
            .map_err(|_| AmountError::Invalid(trimmed.to_string()))?;
        Amount::new(value)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u64::deserialize(deserializer)?;
        Amount::new(value).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<u64> for Amount {
    type Error = AmountError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for u64 {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

/// Formats a signed value with thousands separators: `,` for English and `.` for Vietnamese.
///
/// `1200000` becomes `1,200,000` or `1.200.000`; negative values get a leading `-`. Grouping goes
/// through `f64`, so magnitudes above `MAX_AMOUNT` (2^53 - 1) may print rounded.
pub fn format_amount(value: i64, language: Language) -> String {
    let grouped = format_num::format_num!(",.0f", value.unsigned_abs() as f64);
    let grouped = match language {
        Language::En => grouped,
        Language::Vi => grouped.replace(',', "."),
    };
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
