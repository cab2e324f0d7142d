pub mod disk;
pub mod memory;

use crate::core::ledger::Transaction;
use anyhow::Result;
use uuid::Uuid;

pub use disk::DiskStore;
pub use memory::MemoryStore;

/// Persistence for ledger transactions.
pub trait TransactionStore: Send + Sync {
    /// Inserts or replaces the transaction with the same id.
    fn add(&self, tx: &Transaction) -> Result<()>;

    fn get(&self, id: &Uuid) -> Result<Option<Transaction>>;

    /// Returns `true` if a transaction was removed.
    fn remove(&self, id: &Uuid) -> Result<bool>;

    /// All transactions, newest first.
    fn list(&self) -> Result<Vec<Transaction>>;

    /// Removes everything and returns how many transactions were dropped.
    fn clear(&self) -> Result<usize>;
}

pub(crate) fn newest_first(mut txs: Vec<Transaction>) -> Vec<Transaction> {
    txs.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
    txs
}
