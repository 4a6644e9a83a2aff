//! File-based entity store for persistent storage.

use crate::error::{StorageError, StorageResult};
use crate::record::{Record, RecordId};
use crate::store::EntityStore;
use crate::table::Table;
use parking_lot::RwLock;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A file-based entity store.
///
/// Records are held in memory and the whole collection is written to a JSON
/// snapshot file after every change. Data survives process restarts.
///
/// # Durability
///
/// Each change writes the snapshot to a temporary sibling file, calls
/// `File::sync_all()` and renames it over the store file, so a crash leaves
/// either the old or the new snapshot, never a torn one. A change whose
/// snapshot cannot be written is not applied in memory either.
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
/// Writers are serialized by an internal lock.
///
/// # Example
///
/// ```no_run
/// # use patchsync_storage::{EntityStore, FileStore, Record, RecordId};
/// # use serde::{Deserialize, Serialize};
/// # #[derive(Clone, Serialize, Deserialize)]
/// # struct Note { id: Option<RecordId> }
/// # impl Record for Note {
/// #     fn id(&self) -> Option<RecordId> { self.id }
/// #     fn set_id(&mut self, id: RecordId) { self.id = Some(id); }
/// # }
/// use std::path::Path;
///
/// let store: FileStore<Note> = FileStore::open(Path::new("notes.json")).unwrap();
/// store.save(Note { id: None }).unwrap();
/// ```
#[derive(Debug)]
pub struct FileStore<T: Record> {
    path: PathBuf,
    table: RwLock<Table<T>>,
}

impl<T: Record> FileStore<T> {
    /// Opens or creates a file store at the given path.
    ///
    /// If the file exists, its snapshot is loaded. If it doesn't exist, an
    /// empty snapshot is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written, or if it does
    /// not contain a valid snapshot.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let (table, fresh) = Self::load(path)?;
        let store = Self {
            path: path.to_path_buf(),
            table: RwLock::new(table),
        };

        if fresh {
            store.write_snapshot(&store.table.read())?;
        }

        debug!(
            path = %path.display(),
            records = store.table.read().len(),
            "opened file store"
        );
        Ok(store)
    }

    /// Opens or creates a file store, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file cannot be opened.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::open(path)
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> StorageResult<(Table<T>, bool)> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok((Table::default(), true)),
            Err(e) => return Err(e.into()),
        };

        if bytes.is_empty() {
            return Ok((Table::default(), true));
        }

        let mut table: Table<T> = serde_json::from_slice(&bytes).map_err(|e| {
            StorageError::corrupted(format!("{}: {}", path.display(), e))
        })?;
        table.restore()?;
        Ok((table, false))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_snapshot(&self, table: &Table<T>) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(table)?;
        let temp = self.temp_path();
        {
            let mut file = File::create(&temp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    /// Applies `change` to a copy of the table, persists it, then swaps it in.
    fn mutate<R>(&self, change: impl FnOnce(&mut Table<T>) -> StorageResult<R>) -> StorageResult<R> {
        let mut table = self.table.write();
        let mut next = table.clone();
        let result = change(&mut next)?;
        self.write_snapshot(&next)?;
        *table = next;
        Ok(result)
    }
}

impl<T: Record> EntityStore<T> for FileStore<T> {
    fn find_all_sorted(&self) -> StorageResult<Vec<T>> {
        Ok(self.table.read().all())
    }

    fn find_by_id(&self, id: RecordId) -> StorageResult<Option<T>> {
        Ok(self.table.read().get(id))
    }

    fn save(&self, record: T) -> StorageResult<T> {
        self.mutate(|table| table.save(record))
    }

    fn save_all(&self, records: Vec<T>) -> StorageResult<Vec<T>> {
        self.mutate(|table| table.save_all(records))
    }

    fn delete_by_id(&self, id: RecordId) -> StorageResult<()> {
        if self.table.read().get(id).is_none() {
            return Ok(());
        }
        self.mutate(|table| {
            table.delete(id);
            Ok(())
        })
    }

    fn delete_then_save(&self, ids: &[RecordId], records: Vec<T>) -> StorageResult<Vec<T>> {
        self.mutate(|table| table.delete_then_save(ids, records))
    }

    fn delete_all_by_ids(&self, ids: &[RecordId]) -> StorageResult<()> {
        self.mutate(|table| {
            for id in ids {
                table.delete(*id);
            }
            Ok(())
        })
    }

    fn count(&self) -> StorageResult<usize> {
        Ok(self.table.read().len())
    }
}
