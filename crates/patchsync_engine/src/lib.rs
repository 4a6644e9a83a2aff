//! # patchsync engine
//!
//! JSON Patch synchronization over persistence bridges.
//!
//! This crate provides:
//! - [`DiffSyncEngine`], which applies patches to whole collections or to
//!   single entities and answers with a patch back to the stored state
//! - [`BridgeRegistry`], the frozen map from resource name to bridge
//! - [`SyncConfig`] limits and [`SyncStats`] counters
//!
//! ## Flow
//!
//! For a collection patch the engine:
//! 1. Reads the current state through the bridge (`find_all`)
//! 2. Applies the patch to it as a JSON array, all or nothing
//! 3. Hands new and changed entities to the bridge for saving, and
//!    entities whose ids disappeared for deletion
//! 4. Re-reads the state and returns the diff from the client's patched
//!    view to it
//!
//! ## Key Invariants
//!
//! - The bridge is the only writer; the engine never touches storage
//! - A rejected patch changes nothing
//! - The registry is frozen before the engine serves requests

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod registry;
mod resource;

pub use config::{SyncConfig, DEFAULT_MAX_PATCH_OPERATIONS};
pub use engine::{DiffSyncEngine, SyncStats};
pub use error::{SyncError, SyncResult};
pub use registry::{BridgeRegistry, BridgeRegistryBuilder};
pub use resource::{EntitySync, ResourceSync, SyncOutcome};
