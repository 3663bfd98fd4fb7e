//! Per-category monthly budgets.
//!
//! Budgets are a fixed sample sheet. They are not derived from the ledger, so `used` is whatever
//! the sheet says it is.

use crate::model::{Amount, Category};
use crate::Result;
use anyhow::ensure;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// How many years before and after the current year a new budget may be created for.
const YEAR_WINDOW: i32 = 2;

/// One row of the monthly budget sheet.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Budget {
    category: Category,
    initial: Amount,
    used: Amount,
}

impl Budget {
    pub fn new(category: Category, initial: Amount, used: Amount) -> Self {
        Self {
            category,
            initial,
            used,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn initial(&self) -> Amount {
        self.initial
    }

    pub fn used(&self) -> Amount {
        self.used
    }

    /// Used as a percentage of the initial amount. Can exceed 100. A budget with nothing
    /// allocated reports 0 when nothing was used and 100 otherwise.
    pub fn percent_used(&self) -> f64 {
        if self.initial.is_zero() {
            return if self.used.is_zero() { 0.0 } else { 100.0 };
        }
        self.used.value() as f64 / self.initial.value() as f64 * 100.0
    }

    /// Fraction of the progress bar to fill, clamped to `[0, 1]`.
    pub fn progress(&self) -> f64 {
        (self.percent_used() / 100.0).clamp(0.0, 1.0)
    }

    pub fn is_over_limit(&self) -> bool {
        self.used > self.initial
    }
}

/// The sample budget sheet shown for every month.
pub fn sample_budgets() -> Vec<Budget> {
    [
        (Category::Shopping, 3_000_000, 1_800_000),
        (Category::Foods, 3_500_000, 3_700_000),
        (Category::Healthcare, 1_000_000, 500_000),
        (Category::Entertainment, 2_000_000, 2_200_000),
        (Category::Travel, 2_000_000, 65_000),
        (Category::Learning, 2_000_000, 500_000),
        (Category::House, 2_000_000, 10_000),
    ]
    .into_iter()
    .map(|(category, initial, used)| {
        Budget::new(category, Amount(initial), Amount(used))
    })
    .collect()
}

/// The data entered when creating a new budget.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct BudgetDraft {
    pub month: u32,
    pub year: i32,
    pub amount: Amount,
    pub category: Category,
}

impl BudgetDraft {
    /// Checks the draft against `today`: the month must be 1-12, the year within two years of the
    /// current one, and the amount greater than zero.
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        ensure!(
            (1..=12).contains(&self.month),
            "Month must be between 1 and 12, got {}",
            self.month
        );
        let current = today.year();
        ensure!(
            (current - YEAR_WINDOW..=current + YEAR_WINDOW).contains(&self.year),
            "Year must be between {} and {}, got {}",
            current - YEAR_WINDOW,
            current + YEAR_WINDOW,
            self.year
        );
        ensure!(!self.amount.is_zero(), "Please enter an amount greater than 0");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(v: u64) -> Amount {
        Amount::new(v).unwrap()
    }

    #[test]
    fn test_sample_budgets() {
        let budgets = sample_budgets();
        assert_eq!(budgets.len(), Category::ALL.len());
        let over: Vec<Category> = budgets
            .iter()
            .filter(|b| b.is_over_limit())
            .map(|b| b.category())
            .collect();
        assert_eq!(over, vec![Category::Foods, Category::Entertainment]);
    }

    #[test]
    fn test_percent_and_progress() {
        let b = Budget::new(Category::Foods, amount(3_500_000), amount(3_700_000));
        assert!((b.percent_used() - 105.714).abs() < 0.001);
        assert_eq!(b.progress(), 1.0);

        let b = Budget::new(Category::Shopping, amount(3_000_000), amount(1_800_000));
        assert!((b.percent_used() - 60.0).abs() < f64::EPSILON);
        assert!((b.progress() - 0.6).abs() < f64::EPSILON);
        assert!(!b.is_over_limit());
    }

    #[test]
    fn test_zero_initial() {
        let b = Budget::new(Category::House, Amount::ZERO, Amount::ZERO);
        assert_eq!(b.percent_used(), 0.0);
        let b = Budget::new(Category::House, Amount::ZERO, amount(10));
        assert_eq!(b.percent_used(), 100.0);
        assert!(b.is_over_limit());
    }

    #[test]
    fn test_budget_draft_validation() {
        let today = NaiveDate::from_ymd_opt(2025, 10, 20).unwrap();
        let ok = BudgetDraft {
            month: 10,
            year: 2025,
            amount: amount(2_000_000),
            category: Category::Travel,
        };
        assert!(ok.validate(today).is_ok());
        assert!(BudgetDraft { month: 0, ..ok }.validate(today).is_err());
        assert!(BudgetDraft { month: 13, ..ok }.validate(today).is_err());
        assert!(BudgetDraft { year: 2027, ..ok }.validate(today).is_ok());
        assert!(BudgetDraft { year: 2028, ..ok }.validate(today).is_err());
        assert!(BudgetDraft { year: 2022, ..ok }.validate(today).is_err());
        let err = BudgetDraft {
            amount: Amount::ZERO,
            ..ok
        }
        .validate(today)
        .unwrap_err();
        assert!(err.to_string().contains("greater than 0"));
    }
}
