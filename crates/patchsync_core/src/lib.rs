//! # patchsync core
//!
//! Entities and the persistence bridge for patchsync.
//!
//! This crate provides:
//! - [`Entity`] and [`EntityType`], the typed view of a stored record
//! - the sample entities [`Todo`] and [`Person`]
//! - [`PersistenceBridge`], the seam the sync engine writes through, and
//!   [`StoreBridge`], its implementation over any
//!   [`EntityStore`](patchsync_storage::EntityStore)
//! - [`ResourceService`], plain CRUD over a bridge for REST handlers
//!
//! ## Key Invariants
//!
//! - The bridge is the only writer of a collection
//! - `find_all` is ordered by ascending id
//! - Storage failures surface unchanged; nothing here retries

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod bridge;
mod entity;
mod error;
mod person;
mod service;
mod todo;

pub use bridge::{PersistenceBridge, StoreBridge};
pub use entity::{Entity, EntityType};
pub use error::{CoreError, CoreResult};
pub use person::Person;
pub use service::ResourceService;
pub use todo::Todo;

pub use patchsync_storage::{Record, RecordId};
