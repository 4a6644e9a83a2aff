//! # patchsync storage
//!
//! Id-keyed entity stores for patchsync.
//!
//! This crate is the storage layer the persistence bridge wraps. A store
//! holds a single collection of records keyed by an integer id and offers
//! CRUD with ordering:
//!
//! - sorted enumeration (ascending id)
//! - get by id
//! - save (upsert, assigning an id on first save)
//! - batch delete by id list
//!
//! ## Design Principles
//!
//! - Stores own all locking; callers share them behind `Arc` and call
//!   every method through `&self`
//! - Ids are assigned by the store, never reassigned
//! - Stores never retry; failures surface as [`StorageError`]
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - For tests and ephemeral data
//! - [`FileStore`] - JSON snapshot file, rewritten on every change
//!
//! ## Example
//!
//! ```rust
//! use patchsync_storage::{EntityStore, InMemoryStore, Record, RecordId};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! struct Note {
//!     id: Option<RecordId>,
//!     text: String,
//! }
//!
//! impl Record for Note {
//!     fn id(&self) -> Option<RecordId> {
//!         self.id
//!     }
//!
//!     fn set_id(&mut self, id: RecordId) {
//!         self.id = Some(id);
//!     }
//! }
//!
//! let store = InMemoryStore::new();
//! let saved = store.save(Note { id: None, text: "hello".into() }).unwrap();
//! assert_eq!(saved.id, Some(1));
//! assert_eq!(store.find_by_id(1).unwrap(), Some(saved));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod record;
mod store;
mod table;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use record::{Record, RecordId};
pub use store::EntityStore;
