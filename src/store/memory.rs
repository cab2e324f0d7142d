use super::{TransactionStore, newest_first};
use crate::core::ledger::Transaction;
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Keeps transactions in a `HashMap` for the lifetime of the process.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<Uuid, Transaction>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E>(_: E) -> anyhow::Error {
    anyhow!("Transaction store lock poisoned")
}

impl TransactionStore for MemoryStore {
    fn add(&self, tx: &Transaction) -> Result<()> {
        let mut map = self.inner.write().map_err(poisoned)?;
        debug!("Store PUT {}", tx.id);
        map.insert(tx.id, tx.clone());
        Ok(())
    }

    fn get(&self, id: &Uuid) -> Result<Option<Transaction>> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.get(id).cloned())
    }

    fn remove(&self, id: &Uuid) -> Result<bool> {
        let mut map = self.inner.write().map_err(poisoned)?;
        debug!("Store REMOVE {}", id);
        Ok(map.remove(id).is_some())
    }

    fn list(&self) -> Result<Vec<Transaction>> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(newest_first(map.values().cloned().collect()))
    }

    fn clear(&self) -> Result<usize> {
        let mut map = self.inner.write().map_err(poisoned)?;
        let count = map.len();
        map.clear();
        debug!("Store CLEAR ({count} removed)");
        Ok(count)
    }
}
