//! `/todos`: list, create, replace and delete.

use super::blocking;
use crate::error::ServerResult;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use patchsync_core::{RecordId, Todo};
use patchsync_protocol::{ACCEPT_PATCH_HEADER, JSON_PATCH_MEDIA_TYPE};

/// Every todo in ascending id order. Advertises JSON Patch support.
pub(crate) async fn list(State(state): State<AppState>) -> ServerResult<impl IntoResponse> {
    let todos = state.todos().clone();
    let todos = blocking(move || todos.list()).await?;
    Ok(([(ACCEPT_PATCH_HEADER, JSON_PATCH_MEDIA_TYPE)], Json(todos)))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Todo>, JsonRejection>,
) -> ServerResult<Json<Todo>> {
    let Json(todo) = payload?;
    let todos = state.todos().clone();
    Ok(Json(blocking(move || todos.create(todo)).await?))
}

/// Stores the body under `id`. A body carrying a different id removes the
/// record at `id` and saves the body under its own id.
pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    payload: Result<Json<Todo>, JsonRejection>,
) -> ServerResult<StatusCode> {
    let Json(todo) = payload?;
    let todos = state.todos().clone();
    blocking(move || todos.replace(id, todo)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn remove(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> ServerResult<StatusCode> {
    let todos = state.todos().clone();
    blocking(move || todos.delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
