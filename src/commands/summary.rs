//! The balance summary shown on the home screen.

use crate::commands::{Out, Session};
use crate::{Config, Result};
use serde::Serialize;

/// The ledger aggregates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Summary {
    pub balance: i64,
    pub income: u64,
    pub expense: u64,
}

pub async fn summary(config: Config) -> Result<Out<Summary>> {
    let session = Session::open(&config).await?;
    let ledger = &session.ledger;
    let summary = Summary {
        balance: ledger.balance(),
        income: ledger.total_income(),
        expense: ledger.total_expense(),
    };

    let income = i64::try_from(summary.income).unwrap_or(i64::MAX);
    let expense = i64::try_from(summary.expense).unwrap_or(i64::MAX);
    let message = format!(
        "Balance: {}\nIncome: {}\nExpense: -{}",
        session.signed_money(summary.balance),
        session.signed_money(income),
        session.money(expense),
    );
    Ok(Out::new(message, summary))
}
