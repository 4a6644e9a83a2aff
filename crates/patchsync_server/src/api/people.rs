//! `/people`: the repository-style person resource.

use super::blocking;
use crate::error::ServerResult;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use patchsync_core::{Person, RecordId};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct EmailQuery {
    email: String,
}

pub(crate) async fn list(State(state): State<AppState>) -> ServerResult<Json<Vec<Person>>> {
    let people = state.people().clone();
    Ok(Json(blocking(move || people.list()).await?))
}

pub(crate) async fn get(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> ServerResult<Json<Person>> {
    let people = state.people().clone();
    Ok(Json(blocking(move || people.get(id)).await?))
}

/// Saves a new person; answers 201 with its location.
pub(crate) async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Person>, JsonRejection>,
) -> ServerResult<impl IntoResponse> {
    let Json(person) = payload?;
    let people = state.people().clone();
    let saved = blocking(move || people.create(person)).await?;
    let location = saved
        .id
        .map(|id| format!("/people/{}", id))
        .unwrap_or_default();
    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(saved)))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    payload: Result<Json<Person>, JsonRejection>,
) -> ServerResult<Json<Person>> {
    let Json(person) = payload?;
    let people = state.people().clone();
    Ok(Json(blocking(move || people.replace(id, person)).await?))
}

pub(crate) async fn remove(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> ServerResult<StatusCode> {
    let people = state.people().clone();
    blocking(move || people.delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /people/search/findByEmail?email=...`
pub(crate) async fn find_by_email(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> ServerResult<Json<Vec<Person>>> {
    let email = query.email;
    let people = state.people().clone();
    Ok(Json(
        blocking(move || people.find_where(|p| p.email == email)).await?,
    ))
}
