//! Shared in-memory table used by every store.

use crate::error::{StorageError, StorageResult};
use crate::record::{Record, RecordId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered rows plus the id counter.
///
/// `BTreeMap` keeps enumeration sorted by id without a separate sort step.
/// Every row id is below `next_id`, and `next_id` never exceeds
/// `RecordId::MAX`, so an assigned id is always fresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "T: Record")]
pub(crate) struct Table<T: Record> {
    next_id: RecordId,
    rows: BTreeMap<RecordId, T>,
    /// Unique key -> id of the row holding it. Rebuilt on load.
    #[serde(skip)]
    unique: BTreeMap<String, RecordId>,
}

impl<T: Record> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
            unique: BTreeMap::new(),
        }
    }
}

impl<T: Record> Table<T> {
    pub(crate) fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    pub(crate) fn get(&self, id: RecordId) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn save(&mut self, mut record: T) -> StorageResult<T> {
        let id = match record.id() {
            Some(id) => id,
            None => {
                let id = self.next_id;
                record.set_id(id);
                id
            }
        };
        // The counter must stay above every stored id.
        let after = id
            .checked_add(1)
            .ok_or(StorageError::IdOutOfRange { id })?;

        let key = record.unique_key();
        if let Some(key) = &key {
            if let Some(&existing_id) = self.unique.get(key) {
                if existing_id != id {
                    return Err(StorageError::ConstraintViolation {
                        key: key.clone(),
                        existing_id,
                    });
                }
            }
        }

        if let Some(previous) = self.rows.insert(id, record.clone()) {
            if let Some(old_key) = previous.unique_key() {
                self.unique.remove(&old_key);
            }
        }
        if let Some(key) = key {
            self.unique.insert(key, id);
        }
        self.next_id = self.next_id.max(after);
        Ok(record)
    }

    /// Saves every record or none of them.
    pub(crate) fn save_all(&mut self, records: Vec<T>) -> StorageResult<Vec<T>> {
        self.staged(|table| {
            let mut saved = Vec::with_capacity(records.len());
            for record in records {
                saved.push(table.save(record)?);
            }
            Ok(saved)
        })
    }

    /// Deletes `ids`, then saves `records`. Either all of it happens or none.
    pub(crate) fn delete_then_save(
        &mut self,
        ids: &[RecordId],
        records: Vec<T>,
    ) -> StorageResult<Vec<T>> {
        self.staged(|table| {
            for id in ids {
                table.delete(*id);
            }
            let mut saved = Vec::with_capacity(records.len());
            for record in records {
                saved.push(table.save(record)?);
            }
            Ok(saved)
        })
    }

    fn staged<R>(&mut self, change: impl FnOnce(&mut Self) -> StorageResult<R>) -> StorageResult<R> {
        let mut staged = self.clone();
        let result = change(&mut staged)?;
        *self = staged;
        Ok(result)
    }

    pub(crate) fn clear(&mut self) {
        self.rows.clear();
        self.unique.clear();
    }

    pub(crate) fn delete(&mut self, id: RecordId) -> bool {
        match self.rows.remove(&id) {
            Some(removed) => {
                if let Some(key) = removed.unique_key() {
                    self.unique.remove(&key);
                }
                true
            }
            None => false,
        }
    }

    /// Checks invariants of a table loaded from disk and rebuilds the
    /// unique-key index.
    pub(crate) fn restore(&mut self) -> StorageResult<()> {
        self.unique.clear();
        for (key, row) in &self.rows {
            if row.id() != Some(*key) {
                return Err(StorageError::corrupted(format!(
                    "row stored under id {} carries id {:?}",
                    key,
                    row.id()
                )));
            }
            if *key >= self.next_id {
                return Err(StorageError::corrupted(format!(
                    "row id {} is not below the id counter {}",
                    key, self.next_id
                )));
            }
            if let Some(unique) = row.unique_key() {
                if let Some(other) = self.unique.insert(unique.clone(), *key) {
                    return Err(StorageError::corrupted(format!(
                        "rows {} and {} share unique key {:?}",
                        other, key, unique
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: Option<RecordId>,
        key: String,
    }

    impl Row {
        fn new(id: Option<RecordId>, key: &str) -> Self {
            Self {
                id,
                key: key.to_string(),
            }
        }
    }

    impl Record for Row {
        fn id(&self) -> Option<RecordId> {
            self.id
        }

        fn set_id(&mut self, id: RecordId) {
            self.id = Some(id);
        }

        fn unique_key(&self) -> Option<String> {
            Some(self.key.clone())
        }
    }

    #[test]
    fn max_id_is_rejected() {
        let mut table = Table::default();
        let err = table.save(Row::new(Some(RecordId::MAX), "a")).unwrap_err();
        assert!(matches!(err, StorageError::IdOutOfRange { id: i64::MAX }));
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn exhausted_counter_never_reuses_an_id() {
        let mut table = Table::default();
        table.save(Row::new(Some(RecordId::MAX - 1), "last")).unwrap();

        let err = table.save(Row::new(None, "next")).unwrap_err();
        assert!(matches!(err, StorageError::IdOutOfRange { .. }));
        assert_eq!(table.all(), vec![Row::new(Some(RecordId::MAX - 1), "last")]);
    }

    #[test]
    fn negative_ids_do_not_move_the_counter() {
        let mut table = Table::default();
        table.save(Row::new(Some(-5), "neg")).unwrap();
        let fresh = table.save(Row::new(None, "fresh")).unwrap();
        assert_eq!(fresh.id, Some(1));
        assert!(table.restore().is_ok());
    }

    #[test]
    fn index_follows_updates_and_deletes() {
        let mut table = Table::default();
        table.save(Row::new(Some(1), "a")).unwrap();
        table.save(Row::new(Some(1), "b")).unwrap();

        // "a" was released by the update.
        table.save(Row::new(Some(2), "a")).unwrap();
        assert!(table.save(Row::new(Some(3), "b")).is_err());

        table.delete(1);
        table.save(Row::new(Some(3), "b")).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn delete_then_save_is_all_or_nothing() {
        let mut table = Table::default();
        table.save(Row::new(Some(1), "a")).unwrap();
        table.save(Row::new(Some(2), "b")).unwrap();

        let err = table
            .delete_then_save(&[1], vec![Row::new(Some(5), "b")])
            .unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation { existing_id: 2, .. }));
        assert_eq!(table.get(1), Some(Row::new(Some(1), "a")));

        // The deleted row's key is free for the saved one.
        table
            .delete_then_save(&[1], vec![Row::new(Some(5), "a")])
            .unwrap();
        assert_eq!(table.get(1), None);
        assert_eq!(table.get(5), Some(Row::new(Some(5), "a")));
    }

    #[test]
    fn restore_rebuilds_index_and_rejects_shared_keys() {
        let mut table = Table::default();
        table.save(Row::new(Some(1), "a")).unwrap();
        let json = serde_json::to_string(&table).unwrap();

        let mut loaded: Table<Row> = serde_json::from_str(&json).unwrap();
        loaded.restore().unwrap();
        assert!(loaded.save(Row::new(Some(2), "a")).is_err());

        let shared = r#"{"next_id":3,"rows":{"1":{"id":1,"key":"a"},"2":{"id":2,"key":"a"}}}"#;
        let mut loaded: Table<Row> = serde_json::from_str(shared).unwrap();
        assert!(matches!(loaded.restore(), Err(StorageError::Corrupted(_))));
    }
}
