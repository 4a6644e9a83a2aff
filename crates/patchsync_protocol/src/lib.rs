//! # patchsync protocol
//!
//! Patch documents exchanged by the patchsync engine and its clients.
//!
//! This crate provides:
//! - [`JsonPointer`] for addressing values inside a JSON document (RFC 6901)
//! - [`PatchOperation`] and [`Patch`] for JSON Patch documents (RFC 6902)
//! - [`Patch::apply`] to apply a document, all-or-nothing
//! - [`diff`] to compute the document that turns one value into another
//!
//! This is a pure protocol crate with no I/O operations.
//!
//! ## Example
//!
//! ```rust
//! use patchsync_protocol::{diff, Patch};
//! use serde_json::json;
//!
//! let before = json!([{"id": 1, "complete": false}]);
//! let patch: Patch = serde_json::from_value(json!([
//!     {"op": "replace", "path": "/0/complete", "value": true}
//! ])).unwrap();
//!
//! let after = patch.apply(&before).unwrap();
//! assert_eq!(after, json!([{"id": 1, "complete": true}]));
//! assert_eq!(diff(&before, &after), patch);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod diff;
mod error;
mod operation;
mod pointer;

pub use diff::diff;
pub use error::{PatchError, PatchResult};
pub use operation::{Patch, PatchOperation};
pub use pointer::JsonPointer;

/// Media type of a JSON Patch document.
pub const JSON_PATCH_MEDIA_TYPE: &str = "application/json-patch+json";

/// Response header advertising which patch formats a resource accepts.
pub const ACCEPT_PATCH_HEADER: &str = "Accept-Patch";
