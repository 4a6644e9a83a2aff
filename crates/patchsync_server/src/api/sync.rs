//! `PATCH` endpoints backed by the sync engine.

use super::blocking;
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use patchsync_core::{Entity, RecordId};
use patchsync_protocol::{Patch, JSON_PATCH_MEDIA_TYPE};
use std::sync::Arc;

fn require_patch_media_type(headers: &HeaderMap) -> ServerResult<()> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let essence = content_type
        .and_then(|value| value.split(';').next())
        .map(str::trim);

    match essence {
        Some(media) if media.eq_ignore_ascii_case(JSON_PATCH_MEDIA_TYPE) => Ok(()),
        _ => Err(ServerError::UnsupportedMediaType {
            found: content_type.map(str::to_owned),
            expected: JSON_PATCH_MEDIA_TYPE,
        }),
    }
}

fn patch_response(reply: &Patch) -> ServerResult<Response> {
    let body = serde_json::to_vec(reply).map_err(|e| ServerError::Internal(e.to_string()))?;
    Ok(([(CONTENT_TYPE, JSON_PATCH_MEDIA_TYPE)], body).into_response())
}

/// Applies a patch to the whole collection of `T`.
pub(crate) async fn patch_collection<T: Entity>(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ServerResult<Response> {
    require_patch_media_type(&headers)?;
    let patch = Patch::from_slice(&body)?;
    let engine = Arc::clone(state.engine());
    let reply =
        blocking(move || engine.patch_collection(T::ENTITY_TYPE.resource(), &patch)).await?;
    patch_response(&reply)
}

/// Applies a patch to one `T`.
pub(crate) async fn patch_entity<T: Entity>(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    headers: HeaderMap,
    body: Bytes,
) -> ServerResult<Response> {
    require_patch_media_type(&headers)?;
    let patch = Patch::from_slice(&body)?;
    let engine = Arc::clone(state.engine());
    let reply =
        blocking(move || engine.patch_entity(T::ENTITY_TYPE.resource(), id, &patch)).await?;
    patch_response(&reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn accepts_json_patch() {
        assert!(require_patch_media_type(&headers("application/json-patch+json")).is_ok());
        assert!(
            require_patch_media_type(&headers("application/json-patch+json; charset=utf-8"))
                .is_ok()
        );
    }

    #[test]
    fn rejects_other_media_types() {
        let err = require_patch_media_type(&headers("application/json")).unwrap_err();
        assert!(matches!(err, ServerError::UnsupportedMediaType { found: Some(_), .. }));

        let err = require_patch_media_type(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, ServerError::UnsupportedMediaType { found: None, .. }));
    }
}
