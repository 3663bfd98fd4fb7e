//! The in-memory transaction ledger and its synchronization with the key-value store.
//!
//! The `Ledger` is the single owner of the transaction list. Mutations change memory immediately,
//! publish the new list to subscribers, and queue a write of the whole list. Queued writes are
//! performed one at a time, in order, by a background task, so callers never wait on storage.
//! Storage failures are logged and never returned: if the store is unavailable the ledger keeps
//! working for the rest of the session.

use crate::model::{Draft, Transaction, TransactionId};
use crate::store::KeyValueStore;
use crate::Result;
use anyhow::Context;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, trace, warn};

/// The store key that holds the serialized transaction list.
pub const TRANSACTIONS_KEY: &str = "app_transactions";

/// An immutable view of the transaction list at some point in time.
pub type Snapshot = Arc<Vec<Transaction>>;

/// The transaction ledger. Newest transactions come first.
pub struct Ledger {
    transactions: Snapshot,
    last_id: i64,
    publisher: watch::Sender<Snapshot>,
    writer: mpsc::UnboundedSender<Message>,
}

enum Message {
    Write(Snapshot),
    Flush(oneshot::Sender<()>),
}

impl Ledger {
    /// Loads the persisted transactions from `store` and starts the background writer. A missing,
    /// unreadable or malformed document results in an empty ledger.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn initialize(store: Arc<dyn KeyValueStore>) -> Self {
        let transactions = load(store.as_ref()).await;
        info!("Loaded {} transactions", transactions.len());
        let last_id = transactions
            .iter()
            .filter_map(|t| t.id().millis())
            .max()
            .unwrap_or(0);

        let transactions = Arc::new(transactions);
        let (publisher, _) = watch::channel(transactions.clone());
        let (writer, receiver) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(store, receiver));

        Self {
            transactions,
            last_id,
            publisher,
            writer,
        }
    }

    /// Records a new transaction at the front of the list and returns its identifier.
    pub fn add(&mut self, draft: Draft) -> TransactionId {
        let id = self.next_id();
        let transaction = Transaction::from_draft(id.clone(), draft);
        debug!(
            "Adding {} {} transaction {id}",
            transaction.kind(),
            transaction.amount()
        );
        Arc::make_mut(&mut self.transactions).insert(0, transaction);
        self.changed();
        id
    }

    /// Removes the transaction with `id`. Returns false, and leaves the list as it was, if there
    /// is no such transaction. The list is written either way.
    pub fn delete(&mut self, id: &TransactionId) -> bool {
        let position = self.transactions.iter().position(|t| t.id() == id);
        match position {
            Some(index) => {
                debug!("Deleting transaction {id}");
                Arc::make_mut(&mut self.transactions).remove(index);
            }
            None => debug!("No transaction {id} to delete"),
        }
        self.changed();
        position.is_some()
    }

    /// The sum of all income amounts. Saturates at `u64::MAX`.
    pub fn total_income(&self) -> u64 {
        self.transactions
            .iter()
            .filter(|t| t.is_income())
            .fold(0u64, |sum, t| sum.saturating_add(t.amount().value()))
    }

    /// The sum of all expense amounts. Saturates at `u64::MAX`.
    pub fn total_expense(&self) -> u64 {
        self.transactions
            .iter()
            .filter(|t| t.is_expense())
            .fold(0u64, |sum, t| sum.saturating_add(t.amount().value()))
    }

    /// Income minus expense. Negative when more has been spent than earned.
    ///
    /// Exact while both totals fit in an `i64`. A larger total is clamped to `i64::MAX` first,
    /// so beyond that point the result is no longer `total_income() - total_expense()`.
    pub fn balance(&self) -> i64 {
        let income = i64::try_from(self.total_income()).unwrap_or(i64::MAX);
        let expense = i64::try_from(self.total_expense()).unwrap_or(i64::MAX);
        income - expense
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn snapshot(&self) -> Snapshot {
        self.transactions.clone()
    }

    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id() == id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Returns a receiver that always holds the latest list. It is updated after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.publisher.subscribe()
    }

    /// Waits until every write queued so far has been attempted.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.writer.send(Message::Flush(done)).is_err() {
            error!("The transaction writer has stopped");
            return;
        }
        let _ = wait.await;
    }

    /// Milliseconds since the epoch, moved forward past the last identifier when two
    /// transactions are added within the same millisecond. Once the counter is pinned at
    /// `i64::MAX` by a stored id, a `-<n>` suffix keeps new identifiers unique.
    fn next_id(&mut self) -> TransactionId {
        let millis = Utc::now()
            .timestamp_millis()
            .max(self.last_id.saturating_add(1));
        self.last_id = millis;
        let id = TransactionId::from_millis(millis);
        if self.get(&id).is_none() {
            return id;
        }
        warn!("Transaction id {id} is taken, adding a suffix");
        (1u64..)
            .map(|n| TransactionId::from(format!("{millis}-{n}")))
            .find(|candidate| self.get(candidate).is_none())
            .unwrap_or(id)
    }

    fn changed(&mut self) {
        let snapshot = self.transactions.clone();
        self.publisher.send_replace(snapshot.clone());
        if self.writer.send(Message::Write(snapshot)).is_err() {
            error!("The transaction writer has stopped, changes will not be saved");
        }
    }
}

async fn run_writer(store: Arc<dyn KeyValueStore>, mut receiver: mpsc::UnboundedReceiver<Message>) {
    while let Some(message) = receiver.recv().await {
        match message {
            Message::Write(snapshot) => {
                if let Err(e) = save(store.as_ref(), &snapshot).await {
                    error!("Unable to save transactions: {e:#}");
                }
            }
            Message::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    trace!("Transaction writer finished");
}

async fn save(store: &dyn KeyValueStore, transactions: &[Transaction]) -> Result<()> {
    let json = serde_json::to_string(transactions).context("Unable to serialize transactions")?;
    store.set(TRANSACTIONS_KEY, json).await?;
    trace!("Saved {} transactions", transactions.len());
    Ok(())
}

async fn load(store: &dyn KeyValueStore) -> Vec<Transaction> {
    let raw = match store.get(TRANSACTIONS_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No stored transactions");
            return Vec::new();
        }
        Err(e) => {
            error!("Unable to read stored transactions: {e:#}");
            return Vec::new();
        }
    };
    match parse(&raw) {
        Ok(transactions) => transactions,
        Err(e) => {
            error!("Unable to parse stored transactions: {e:#}");
            Vec::new()
        }
    }
}

/// Parses the stored document one record at a time, skipping records that are invalid or that
/// repeat an earlier identifier.
fn parse(raw: &str) -> Result<Vec<Transaction>> {
    let records: Vec<serde_json::Value> =
        serde_json::from_str(raw).context("The stored transactions are not a JSON array")?;

    let mut seen = HashSet::with_capacity(records.len());
    let mut transactions = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Transaction>(record) {
            Ok(t) if seen.insert(t.id().clone()) => transactions.push(t),
            Ok(t) => warn!("Skipping record {index}, the id {} was already seen", t.id()),
            Err(e) => warn!("Skipping record {index}: {e}"),
        }
    }
    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Category, TransactionType};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft(kind: TransactionType, amount: u64) -> Draft {
        Draft::new(kind, Amount::new(amount).unwrap(), date(2025, 10, 20))
    }

    async fn ledger(store: &MemoryStore) -> Ledger {
        Ledger::initialize(Arc::new(store.clone())).await
    }

    fn assert_balanced(ledger: &Ledger) {
        assert_eq!(
            ledger.balance(),
            ledger.total_income() as i64 - ledger.total_expense() as i64
        );
    }

    #[tokio::test]
    async fn test_initialize_empty_store() {
        let store = MemoryStore::new();
        let ledger = ledger(&store).await;
        assert!(ledger.is_empty());
        assert_eq!(ledger.balance(), 0);
        ledger.flush().await;
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_balance_scenario() {
        let store = MemoryStore::new();
        let mut ledger = ledger(&store).await;

        ledger.add(draft(TransactionType::Income, 100_000));
        assert_eq!(ledger.balance(), 100_000);
        assert_balanced(&ledger);

        let expense = ledger.add(draft(TransactionType::Expense, 40_000));
        assert_eq!(ledger.balance(), 60_000);
        assert_eq!(ledger.total_income(), 100_000);
        assert_eq!(ledger.total_expense(), 40_000);
        assert_balanced(&ledger);

        assert!(ledger.delete(&expense));
        assert_eq!(ledger.balance(), 100_000);
        assert_balanced(&ledger);
    }

    #[tokio::test]
    async fn test_negative_balance() {
        let store = MemoryStore::new();
        let mut ledger = ledger(&store).await;
        ledger.add(draft(TransactionType::Expense, 60_000));
        assert_eq!(ledger.balance(), -60_000);
    }

    #[tokio::test]
    async fn test_add_prepends() {
        let store = MemoryStore::new();
        let mut ledger = ledger(&store).await;
        let first = ledger.add(draft(TransactionType::Income, 1));
        let before = ledger.len();
        let second = ledger.add(
            draft(TransactionType::Expense, 2)
                .with_note("Coffee")
                .with_category(Category::Foods),
        );
        assert_eq!(ledger.len(), before + 1);
        assert_eq!(ledger.transactions()[0].id(), &second);
        assert_eq!(ledger.transactions()[1].id(), &first);
        assert_eq!(ledger.transactions()[0].note(), "Coffee");
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = MemoryStore::new();
        let mut ledger = ledger(&store).await;
        let ids: Vec<TransactionId> = (0..50)
            .map(|i| ledger.add(draft(TransactionType::Income, i)))
            .collect();
        let unique: HashSet<&TransactionId> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        let millis: Vec<i64> = ids.iter().map(|id| id.millis().unwrap()).collect();
        assert!(millis.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_ids_follow_loaded_ids() {
        let far_future = Utc::now().timestamp_millis() + 1_000_000;
        let doc = format!(
            r#"[{{"id":"{far_future}","type":"income","amount":1,"note":"","date":"2025-10-20"}}]"#
        );
        let store = MemoryStore::with_data([(TRANSACTIONS_KEY, doc)]);
        let mut ledger = ledger(&store).await;
        let id = ledger.add(draft(TransactionType::Income, 1));
        assert_eq!(id.millis(), Some(far_future + 1));
    }

    #[tokio::test]
    async fn test_add_after_largest_stored_id() {
        let doc = format!(
            r#"[{{"id":"{}","type":"income","amount":1,"note":"","date":"2025-10-20"}}]"#,
            i64::MAX
        );
        let store = MemoryStore::with_data([(TRANSACTIONS_KEY, doc)]);
        let mut ledger = ledger(&store).await;
        assert_eq!(ledger.len(), 1);

        let first = ledger.add(draft(TransactionType::Income, 2));
        let second = ledger.add(draft(TransactionType::Expense, 3));
        assert_eq!(ledger.len(), 3);
        assert_ne!(first, second);
        assert_ne!(first.as_str(), i64::MAX.to_string());
        assert_ne!(second.as_str(), i64::MAX.to_string());
        let unique: HashSet<&TransactionId> = ledger.transactions().iter().map(|t| t.id()).collect();
        assert_eq!(unique.len(), 3);

        ledger.flush().await;
        let reloaded = self::ledger(&store).await;
        assert_eq!(reloaded.transactions(), ledger.transactions());
    }

    #[tokio::test]
    async fn test_large_totals() {
        use crate::model::MAX_AMOUNT;
        let store = MemoryStore::new();
        let mut ledger = ledger(&store).await;
        ledger.add(draft(TransactionType::Income, MAX_AMOUNT));
        ledger.add(draft(TransactionType::Income, MAX_AMOUNT));
        ledger.add(draft(TransactionType::Expense, 1));

        assert_eq!(ledger.total_income(), 2 * MAX_AMOUNT);
        assert_eq!(ledger.total_expense(), 1);
        assert_eq!(ledger.balance(), 2 * MAX_AMOUNT as i64 - 1);
        assert_balanced(&ledger);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        let mut ledger = ledger(&store).await;
        let keep = ledger.add(draft(TransactionType::Income, 10));
        let gone = ledger.add(draft(TransactionType::Income, 20));

        assert!(ledger.delete(&gone));
        assert!(ledger.get(&gone).is_none());
        assert!(ledger.get(&keep).is_some());

        let len = ledger.len();
        assert!(!ledger.delete(&TransactionId::from("missing")));
        assert_eq!(ledger.len(), len);
    }

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemoryStore::new();
        let mut ledger = ledger(&store).await;
        ledger.add(draft(TransactionType::Income, 5_000_000).with_note("Salary"));
        ledger.add(
            draft(TransactionType::Expense, 450_000)
                .with_note("Grocery")
                .with_category(Category::Foods),
        );
        ledger.flush().await;

        let reloaded = Ledger::initialize(Arc::new(store.clone())).await;
        assert_eq!(reloaded.transactions(), ledger.transactions());
    }

    #[tokio::test]
    async fn test_every_mutation_writes() {
        let store = MemoryStore::new();
        let mut ledger = ledger(&store).await;
        let id = ledger.add(draft(TransactionType::Income, 1));
        ledger.add(draft(TransactionType::Income, 2));
        ledger.delete(&id);
        ledger.delete(&id);
        ledger.flush().await;
        assert_eq!(store.writes(), 4);
    }

    #[tokio::test]
    async fn test_last_write_is_latest_state() {
        let store = MemoryStore::new();
        let mut ledger = ledger(&store).await;
        let id = ledger.add(draft(TransactionType::Income, 1));
        ledger.delete(&id);
        ledger.flush().await;
        assert_eq!(store.peek(TRANSACTIONS_KEY).as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_read_failure_gives_empty_ledger() {
        let store = MemoryStore::with_data([(TRANSACTIONS_KEY, "[]")]);
        store.fail_reads(true);
        let ledger = ledger(&store).await;
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory() {
        let store = MemoryStore::new();
        store.fail_writes(true);
        let mut ledger = ledger(&store).await;
        let id = ledger.add(draft(TransactionType::Expense, 40_000));
        ledger.flush().await;
        assert!(ledger.get(&id).is_some());
        assert_eq!(ledger.balance(), -40_000);
        assert_eq!(store.peek(TRANSACTIONS_KEY), None);

        // Once the store recovers the next mutation saves everything.
        store.fail_writes(false);
        ledger.add(draft(TransactionType::Income, 100_000));
        ledger.flush().await;
        let reloaded = Ledger::initialize(Arc::new(store.clone())).await;
        assert_eq!(reloaded.len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_document() {
        for doc in ["not json", "{\"id\":\"1\"}", "42"] {
            let store = MemoryStore::with_data([(TRANSACTIONS_KEY, doc)]);
            let ledger = ledger(&store).await;
            assert!(ledger.is_empty(), "expected empty ledger for {doc}");
        }
    }

    #[tokio::test]
    async fn test_invalid_records_are_skipped() {
        let doc = r#"[
            {"id":"1","type":"income","amount":100000,"note":"ok","date":"2025-10-20"},
            {"id":"2","type":"transfer","amount":5,"note":"","date":"2025-10-20"},
            {"id":"3","type":"expense","amount":-5,"note":"","date":"2025-10-20"},
            {"id":"4","type":"expense","amount":5,"note":"","date":"2025-10-20","category":"pets"},
            {"id":"5","type":"expense","amount":5,"note":"","date":"someday"},
            {"id":"1","type":"expense","amount":7,"note":"dup","date":"2025-10-20"},
            {"id":"6","type":"expense","amount":40000,"date":"2025-10-17T05:00:00.000Z","category":null}
        ]"#;
        let store = MemoryStore::with_data([(TRANSACTIONS_KEY, doc)]);
        let ledger = ledger(&store).await;
        let ids: Vec<&str> = ledger.transactions().iter().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, vec!["1", "6"]);
        assert_eq!(ledger.balance(), 60_000);
        assert_eq!(ledger.transactions()[1].note(), "");
    }

    #[tokio::test]
    async fn test_subscribe() {
        let store = MemoryStore::new();
        let mut ledger = ledger(&store).await;
        let mut receiver = ledger.subscribe();
        assert!(receiver.borrow_and_update().is_empty());

        let id = ledger.add(draft(TransactionType::Income, 3));
        assert!(receiver.has_changed().unwrap());
        let snapshot = receiver.borrow_and_update().clone();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id(), &id);

        ledger.delete(&id);
        assert!(receiver.borrow_and_update().is_empty());
        // Snapshots already handed out do not change.
        assert_eq!(snapshot.len(), 1);
    }
}
