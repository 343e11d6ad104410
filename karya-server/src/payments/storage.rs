//! redb-based storage layer for order records
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | `OrderRecord` (JSON) | 订单记录 (含只追加历史) |
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate` by default: once `commit()`
//! returns the record is persistent, which is what allows `initiate` to
//! expose the order id to the gateway only after the `created` record is
//! already on disk.
//!
//! # Atomicity
//!
//! redb is single-writer. The coordinator performs its entire
//! lookup-compute-commit sequence inside one [`WriteTransaction`], which
//! linearizes callback application per order (and, as an implementation
//! artifact, across orders — stronger than required, and cheap at this
//! write rate). A dropped transaction aborts with no visible mutation.

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
    WriteTransaction,
};
use shared::payment::OrderRecord;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for order records: key = order_id, value = JSON-serialized OrderRecord
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Order already exists: {0}")]
    OrderExists(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Order storage backed by redb
#[derive(Clone)]
pub struct OrderStore {
    db: Arc<Database>,
}

impl OrderStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;

        // Initialize tables
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    ///
    /// The caller drives the transaction: load, mutate, store, commit.
    /// Dropping the transaction without committing aborts it.
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Load an order within a write transaction
    pub fn load_order(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<OrderRecord>> {
        let table = txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Store (insert or overwrite) an order within a write transaction
    pub fn store_order(&self, txn: &WriteTransaction, record: &OrderRecord) -> StorageResult<()> {
        let bytes = serde_json::to_vec(record)?;
        let mut table = txn.open_table(ORDERS_TABLE)?;
        table.insert(record.order_id.as_str(), bytes.as_slice())?;
        Ok(())
    }

    /// Insert a brand-new order within a write transaction
    ///
    /// order_id 一次性分配；重复写入视为存储层错误而非覆盖。
    pub fn store_new(&self, txn: &WriteTransaction, record: &OrderRecord) -> StorageResult<()> {
        {
            let table = txn.open_table(ORDERS_TABLE)?;
            if table.get(record.order_id.as_str())?.is_some() {
                return Err(StorageError::OrderExists(record.order_id.clone()));
            }
        }
        self.store_order(txn, record)
    }

    /// Read an order outside any write transaction
    pub fn get(&self, order_id: &str) -> StorageResult<Option<OrderRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Number of stored orders (health check)
    pub fn order_count(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        Ok(table.len()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::payment::{CustomerDetails, PaymentStatus};

    fn customer() -> CustomerDetails {
        CustomerDetails {
            first_name: "Budi".to_string(),
            last_name: "Santoso".to_string(),
            email: "budi.santoso@example.com".to_string(),
            phone: "08123456789".to_string(),
        }
    }

    #[test]
    fn store_and_load_roundtrip() {
        let store = OrderStore::open_in_memory().unwrap();
        let record = OrderRecord::new("2".to_string(), 2_500_000, customer());

        let txn = store.begin_write().unwrap();
        store.store_new(&txn, &record).unwrap();
        txn.commit().unwrap();

        let loaded = store.get(&record.order_id).unwrap().unwrap();
        assert_eq!(loaded.order_id, record.order_id);
        assert_eq!(loaded.gross_amount, 2_500_000);
        assert_eq!(loaded.status, PaymentStatus::Created);
        assert_eq!(loaded.status_history.len(), 1);
    }

    #[test]
    fn store_new_rejects_duplicate_ids() {
        let store = OrderStore::open_in_memory().unwrap();
        let record = OrderRecord::new("1".to_string(), 100, customer());

        let txn = store.begin_write().unwrap();
        store.store_new(&txn, &record).unwrap();
        txn.commit().unwrap();

        let txn = store.begin_write().unwrap();
        let result = store.store_new(&txn, &record);
        assert!(matches!(result, Err(StorageError::OrderExists(_))));
    }

    #[test]
    fn dropped_transaction_leaves_no_trace() {
        let store = OrderStore::open_in_memory().unwrap();
        let record = OrderRecord::new("1".to_string(), 100, customer());

        {
            let txn = store.begin_write().unwrap();
            store.store_new(&txn, &record).unwrap();
            // txn dropped without commit
        }

        assert!(store.get(&record.order_id).unwrap().is_none());
        assert_eq!(store.order_count().unwrap(), 0);
    }

    #[test]
    fn mutation_in_transaction_is_atomic() {
        let store = OrderStore::open_in_memory().unwrap();
        let record = OrderRecord::new("1".to_string(), 100, customer());

        let txn = store.begin_write().unwrap();
        store.store_new(&txn, &record).unwrap();
        txn.commit().unwrap();

        let txn = store.begin_write().unwrap();
        let mut loaded = store.load_order(&txn, &record.order_id).unwrap().unwrap();
        loaded.apply_transition(PaymentStatus::Success, "e1");
        store.store_order(&txn, &loaded).unwrap();
        txn.commit().unwrap();

        let loaded = store.get(&record.order_id).unwrap().unwrap();
        assert_eq!(loaded.status, PaymentStatus::Success);
        assert_eq!(loaded.last_event_id.as_deref(), Some("e1"));
        assert_eq!(loaded.status_history.len(), 2);
    }

    #[test]
    fn missing_order_reads_as_none() {
        let store = OrderStore::open_in_memory().unwrap();
        assert!(store.get("ORDER-missing").unwrap().is_none());
    }
}
