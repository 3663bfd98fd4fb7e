//! The monthly budget sheet.
//!
//! Budgets are sample data. They are shown for whichever month is asked for, and a new budget is
//! only checked and echoed back, never saved.

use crate::args::{BudgetArgs, NewBudgetArgs};
use crate::commands::Out;
use crate::model::{sample_budgets, Amount, Budget, BudgetDraft};
use crate::{prefs, Config, Result};
use anyhow::bail;
use chrono::{Datelike, Local, NaiveDate};
use std::str::FromStr;
use tracing::debug;

/// Shows the budget sheet for the month in `args`, defaulting to the current month.
pub async fn budget(config: Config, args: BudgetArgs) -> Result<Out<Vec<Budget>>> {
    let store = config.store().await?;
    let language = prefs::language(&store).await;
    let today = Local::now().date_naive();
    let month = args.month().unwrap_or(today.month());
    let year = args.year().unwrap_or(today.year());
    if !(1..=12).contains(&month) {
        bail!("Month must be between 1 and 12, got {month}");
    }

    let budgets = sample_budgets();
    let symbol = config.currency_symbol();
    let money = |amount: Amount| format!("{}{}", amount.format(language), symbol);

    let mut lines = vec![format!("Budgets for {month:02}/{year}")];
    for b in &budgets {
        let mut line = format!(
            "{}: {} / {} ({:.1}%)",
            b.category().label(language),
            money(b.used()),
            money(b.initial()),
            b.percent_used()
        );
        if b.is_over_limit() {
            line.push_str(" over limit");
        }
        lines.push(line);
    }
    Ok(Out::new(lines.join("\n"), budgets))
}

/// Checks a new budget and echoes it back.
pub async fn new_budget(config: Config, args: NewBudgetArgs) -> Result<Out<BudgetDraft>> {
    new_budget_on(config, args, Local::now().date_naive()).await
}

async fn new_budget_on(
    config: Config,
    args: NewBudgetArgs,
    today: NaiveDate,
) -> Result<Out<BudgetDraft>> {
    let amount = match Amount::from_str(args.amount()) {
        Ok(amount) => amount,
        Err(e) => bail!("Please enter an amount greater than 0 ({e})"),
    };
    let draft = BudgetDraft {
        month: args.month().unwrap_or(today.month()),
        year: args.year().unwrap_or(today.year()),
        amount,
        category: args.category(),
    };
    draft.validate(today)?;
    debug!("Budget data: {draft:?}");

    let language = prefs::language(&config.store().await?).await;
    let message = format!(
        "Budget for {} in {:02}/{}: {}{}",
        draft.category.label(language),
        draft.month,
        draft.year,
        draft.amount.format(language),
        config.currency_symbol()
    );
    Ok(Out::new(message, draft))
}
