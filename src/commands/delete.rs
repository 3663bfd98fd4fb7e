//! Delete command handler.

use crate::args::DeleteArgs;
use crate::commands::{Out, Session};
use crate::model::{Transaction, TransactionId};
use crate::{Config, Result};

/// Deletes the transaction with the given id and returns it. Deleting an id that is not in the
/// ledger is not an error; the returned structure is `None` in that case.
pub async fn delete(config: Config, args: DeleteArgs) -> Result<Out<Option<Transaction>>> {
    let id = TransactionId::from(args.id());
    let mut session = Session::open(&config).await?;

    let existing = session.ledger.get(&id).cloned();
    session.ledger.delete(&id);
    session.ledger.flush().await;

    let message = match &existing {
        Some(_) => format!("Deleted transaction {id}"),
        None => format!("No transaction with id {id}"),
    };
    Ok(Out::new(message, existing))
}
