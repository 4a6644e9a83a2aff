//! Entity store trait definition.

use crate::error::StorageResult;
use crate::record::{Record, RecordId};

/// A collection of records keyed by integer id.
///
/// Stores are shared between request handlers, so every method takes
/// `&self` and implementations guard their state internally. A single call
/// is atomic with respect to other calls on the same store.
///
/// # Invariants
///
/// - `find_all_sorted` returns records in ascending id order
/// - `save` of a record without an id assigns one that was never used
/// - an assigned id is never changed by the store
/// - `RecordId::MAX` is never stored; saving it fails with
///   [`StorageError::IdOutOfRange`](crate::StorageError::IdOutOfRange)
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - For testing
/// - [`super::FileStore`] - For persistent storage
pub trait EntityStore<T: Record>: Send + Sync {
    /// Returns every record, ordered by ascending id.
    ///
    /// An empty store yields an empty vector.
    fn find_all_sorted(&self) -> StorageResult<Vec<T>>;

    /// Returns the record with the given id, if any.
    fn find_by_id(&self, id: RecordId) -> StorageResult<Option<T>>;

    /// Saves a record, inserting it or overwriting the record with the same id.
    ///
    /// Returns the stored record, with its id filled in.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the record's unique key is already held by another record
    /// - the store cannot be written
    fn save(&self, record: T) -> StorageResult<T>;

    /// Saves several records in one step.
    ///
    /// Either all records are saved or, on error, none are.
    fn save_all(&self, records: Vec<T>) -> StorageResult<Vec<T>>;

    /// Deletes every record in `ids`, then saves `records`, in one step.
    ///
    /// Either the whole change is applied or, on error, none of it.
    /// Because the deletes come first, a saved record may take over a
    /// unique key that a deleted record held.
    fn delete_then_save(&self, ids: &[RecordId], records: Vec<T>) -> StorageResult<Vec<T>>;

    /// Deletes the record with the given id.
    ///
    /// Deleting an id that does not exist is a no-op.
    fn delete_by_id(&self, id: RecordId) -> StorageResult<()>;

    /// Deletes every record whose id is in `ids`.
    ///
    /// Unknown ids are skipped.
    fn delete_all_by_ids(&self, ids: &[RecordId]) -> StorageResult<()>;

    /// Returns the number of records.
    fn count(&self) -> StorageResult<usize>;

    /// Checks whether a record with the given id exists.
    fn exists(&self, id: RecordId) -> StorageResult<bool> {
        Ok(self.find_by_id(id)?.is_some())
    }
}
