use super::{TransactionStore, newest_first};
use crate::core::config::AppConfig;
use crate::core::ledger::Transaction;
use anyhow::{Context, Result};
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

const PARTITION: &str = "transactions";

/// Transactions persisted in a fjall keyspace, one JSON value per id.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open ledger at {}", path.display()))?;
        let partition = keyspace
            .open_partition(PARTITION, PartitionCreateOptions::default())
            .context("Failed to open transactions partition")?;
        debug!("Opened ledger at {}", path.display());

        Ok(Self {
            keyspace,
            partition,
        })
    }

    /// Opens the ledger under the configured data directory.
    pub fn for_config(config: &AppConfig) -> Result<Self> {
        Self::open(&config.data_path()?.join("ledger"))
    }

    fn persist(&self) -> Result<()> {
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to flush ledger to disk")
    }
}

impl TransactionStore for DiskStore {
    fn add(&self, tx: &Transaction) -> Result<()> {
        let value = serde_json::to_vec(tx)?;
        self.partition.insert(tx.id.to_string(), value)?;
        debug!("Store PUT {}", tx.id);
        self.persist()
    }

    fn get(&self, id: &Uuid) -> Result<Option<Transaction>> {
        match self.partition.get(id.to_string())? {
            Some(bytes) => {
                let tx = serde_json::from_slice(&bytes)
                    .with_context(|| format!("Corrupt ledger entry for {id}"))?;
                Ok(Some(tx))
            }
            None => Ok(None),
        }
    }

    fn remove(&self, id: &Uuid) -> Result<bool> {
        let key = id.to_string();
        if !self.partition.contains_key(&key)? {
            return Ok(false);
        }
        self.partition.remove(key)?;
        debug!("Store REMOVE {}", id);
        self.persist()?;
        Ok(true)
    }

    fn list(&self) -> Result<Vec<Transaction>> {
        let mut txs = Vec::new();
        for item in self.partition.iter() {
            let (key, value) = item?;
            let tx: Transaction = serde_json::from_slice(&value).with_context(|| {
                format!("Corrupt ledger entry for {}", String::from_utf8_lossy(&key))
            })?;
            txs.push(tx);
        }
        Ok(newest_first(txs))
    }

    fn clear(&self) -> Result<usize> {
        let keys = self
            .partition
            .keys()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for key in &keys {
            self.partition.remove(key.as_ref())?;
        }
        debug!("Store CLEAR ({} removed)", keys.len());
        self.persist()?;
        Ok(keys.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ledger::{Category, TransactionKind};
    use tempfile::tempdir;

    fn expense(title: &str, amount: f64) -> Transaction {
        Transaction::new(title, amount, TransactionKind::Expense, Category::Food).unwrap()
    }

    #[test]
    fn test_disk_store_get_put() -> Result<()> {
        let dir = tempdir()?;
        let store = DiskStore::open(dir.path())?;

        let tx = expense("Lunch", 12.5).with_notes("team lunch");
        assert!(store.get(&tx.id)?.is_none());

        store.add(&tx)?;
        assert_eq!(store.get(&tx.id)?, Some(tx.clone()));
        assert_eq!(store.list()?, vec![tx]);
        Ok(())
    }

    #[test]
    fn test_disk_store_survives_reopen() -> Result<()> {
        let dir = tempdir()?;
        let tx = expense("Dinner", 40.0);
        {
            let store = DiskStore::open(dir.path())?;
            store.add(&tx)?;
        }

        let store = DiskStore::open(dir.path())?;
        assert_eq!(store.get(&tx.id)?, Some(tx));
        Ok(())
    }

    #[test]
    fn test_disk_store_remove_and_clear() -> Result<()> {
        let dir = tempdir()?;
        let store = DiskStore::open(dir.path())?;

        let a = expense("Coffee", 3.0);
        let b = expense("Snacks", 5.0);
        store.add(&a)?;
        store.add(&b)?;

        assert!(store.remove(&a.id)?);
        assert!(!store.remove(&a.id)?);
        assert_eq!(store.list()?.len(), 1);

        assert_eq!(store.clear()?, 1);
        assert!(store.list()?.is_empty());
        Ok(())
    }
}
