//! In-memory entity store for testing.

use crate::error::StorageResult;
use crate::record::{Record, RecordId};
use crate::store::EntityStore;
use crate::table::Table;
use parking_lot::RwLock;

/// An in-memory entity store.
///
/// This store keeps all records in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Demo servers that don't need persistence
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
#[derive(Debug)]
pub struct InMemoryStore<T: Record> {
    table: RwLock<Table<T>>,
}

impl<T: Record> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self {
            table: RwLock::new(Table::default()),
        }
    }
}

impl<T: Record> InMemoryStore<T> {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given records.
    ///
    /// # Errors
    ///
    /// Returns an error if the records break a unique constraint.
    pub fn with_records(records: Vec<T>) -> StorageResult<Self> {
        let store = Self::new();
        store.save_all(records)?;
        Ok(store)
    }

    /// Removes every record. The id counter is kept.
    pub fn clear(&self) {
        self.table.write().clear();
    }
}

impl<T: Record> EntityStore<T> for InMemoryStore<T> {
    fn find_all_sorted(&self) -> StorageResult<Vec<T>> {
        Ok(self.table.read().all())
    }

    fn find_by_id(&self, id: RecordId) -> StorageResult<Option<T>> {
        Ok(self.table.read().get(id))
    }

    fn save(&self, record: T) -> StorageResult<T> {
        self.table.write().save(record)
    }

    fn save_all(&self, records: Vec<T>) -> StorageResult<Vec<T>> {
        self.table.write().save_all(records)
    }

    fn delete_by_id(&self, id: RecordId) -> StorageResult<()> {
        self.table.write().delete(id);
        Ok(())
    }

    fn delete_then_save(&self, ids: &[RecordId], records: Vec<T>) -> StorageResult<Vec<T>> {
        self.table.write().delete_then_save(ids, records)
    }

    fn delete_all_by_ids(&self, ids: &[RecordId]) -> StorageResult<()> {
        let mut table = self.table.write();
        for id in ids {
            table.delete(*id);
        }
        Ok(())
    }

    fn count(&self) -> StorageResult<usize> {
        Ok(self.table.read().len())
    }
}
