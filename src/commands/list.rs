//! The transaction history command.

use crate::args::ListArgs;
use crate::commands::{Out, Session};
use crate::model::Transaction;
use crate::{Config, Result};

/// Lists the transactions that pass the filter given in `args`, newest first.
pub async fn list(config: Config, args: ListArgs) -> Result<Out<Vec<Transaction>>> {
    let session = Session::open(&config).await?;
    let filter = args.filter();
    let found: Vec<Transaction> = filter
        .apply(session.ledger.transactions())
        .into_iter()
        .cloned()
        .collect();

    if found.is_empty() {
        return Ok(Out::new("No transactions", found));
    }

    let mut lines = Vec::with_capacity(found.len() + 1);
    lines.push(format!(
        "{} transaction{}",
        found.len(),
        if found.len() == 1 { "" } else { "s" }
    ));
    lines.extend(found.iter().map(|t| row(&session, t)));
    Ok(Out::new(lines.join("\n"), found))
}

/// One line of the history: id, signed amount, date, category and note.
fn row(session: &Session, t: &Transaction) -> String {
    let amount = format!(
        "{}{}",
        t.kind().sign(),
        session.money(t.amount().value() as i64)
    );
    let category = t
        .category()
        .map(|c| c.label(session.language))
        .unwrap_or("-");
    format!("{}  {amount}  {}  {category}  {}", t.id(), t.date(), t.note())
        .trim_end()
        .to_string()
}
