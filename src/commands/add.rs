//! The add-transaction command.

use crate::args::AddArgs;
use crate::commands::{Out, Session};
use crate::model::{Amount, AmountError, Draft, Transaction};
use crate::{Config, Result};
use anyhow::{bail, Context};
use chrono::Local;
use std::str::FromStr;
use tracing::debug;

const AMOUNT_REQUIRED: &str = "Please enter an amount greater than 0";

/// Records a new transaction and returns it.
///
/// The amount is typed text. Blank, zero or unparsable input is rejected before anything is
/// recorded. The note is trimmed and the date defaults to today in local time.
pub async fn add(config: Config, args: AddArgs) -> Result<Out<Transaction>> {
    let amount = entry_amount(args.amount())?;
    let date = args.date().unwrap_or_else(|| Local::now().date_naive());
    let draft = Draft::new(args.kind(), amount, date)
        .with_note(args.note().trim())
        .with_category(args.category());

    let mut session = Session::open(&config).await?;
    let id = session.ledger.add(draft);
    session.ledger.flush().await;

    let transaction = session
        .ledger
        .get(&id)
        .cloned()
        .with_context(|| format!("Transaction {id} is missing after it was added"))?;
    let message = format!(
        "Added {} of {} ({id})",
        transaction.kind().label(session.language).to_lowercase(),
        session.money(transaction.amount().value() as i64),
    );
    Ok(Out::new(message, transaction))
}

/// Parses the amount typed on the keypad, which must be a whole number greater than zero.
fn entry_amount(text: &str) -> Result<Amount> {
    match Amount::from_str(text) {
        Ok(amount) if !amount.is_zero() => Ok(amount),
        Ok(_) => bail!(AMOUNT_REQUIRED),
        Err(e @ AmountError::TooLarge(_)) => Err(e.into()),
        Err(e) => {
            debug!("Rejected amount input: {e}");
            bail!(AMOUNT_REQUIRED)
        }
    }
}
