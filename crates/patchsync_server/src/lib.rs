//! # patchsync server
//!
//! HTTP surface for patchsync.
//!
//! This crate provides:
//! - REST handlers for `/todos` and `/people`
//! - `PATCH` endpoints that accept `application/json-patch+json` and answer
//!   with a patch, backed by [`DiffSyncEngine`](patchsync_engine::DiffSyncEngine)
//! - A greeting endpoint, `/hi/{name}`
//! - Shallow `ETag` / `If-None-Match` handling for `GET` responses
//! - [`AppState`], the composition root wiring stores, bridges and engine
//!
//! # Errors
//!
//! | condition | status |
//! |---|---|
//! | entity not found | 404 |
//! | malformed body or patch, rejected patch | 400 |
//! | failed `test` operation | 422 |
//! | wrong `Content-Type` on `PATCH` | 415 |
//! | unique key already taken | 409 |
//! | storage failure | 500 |

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod api;
mod config;
mod error;
mod etag;
mod seed;
mod server;
mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use etag::entity_tag;
pub use seed::seed;
pub use server::{build_router, serve, serve_with_shutdown};
pub use state::AppState;
