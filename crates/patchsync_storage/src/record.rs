//! Record trait for storable entities.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Integer identity of a stored record.
pub type RecordId = i64;

/// A value that can live in an [`EntityStore`](crate::EntityStore).
///
/// Records carry an optional id. A record without an id is new; the store
/// assigns one on its first save and the id never changes afterwards.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Returns the record id, or `None` if it has never been saved.
    fn id(&self) -> Option<RecordId>;

    /// Sets the record id. Only stores call this.
    fn set_id(&mut self, id: RecordId);

    /// Returns the value of a field that must be unique across the store.
    ///
    /// Stores reject a save that would give two records the same key.
    fn unique_key(&self) -> Option<String> {
        None
    }
}
