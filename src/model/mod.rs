//! Types that represent the core data model, such as `Transaction` and `Category`.
mod amount;
mod budget;
mod category;
mod transaction;

pub use amount::{format_amount, Amount, AmountError, MAX_AMOUNT};
pub use budget::{sample_budgets, Budget, BudgetDraft};
pub use category::Category;
pub use transaction::{Draft, Transaction, TransactionId, TransactionType};
