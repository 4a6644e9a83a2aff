//! Shallow `ETag` support.
//!
//! The tag is a hash of the rendered response body, so it saves bandwidth
//! but not the work of producing the response.

use crate::error::ServerError;
use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::header::{ETAG, IF_NONE_MATCH};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Computes the quoted entity tag of a body.
pub fn entity_tag(body: &[u8]) -> String {
    let hex: String = Sha256::digest(body)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect();
    format!("\"{}\"", hex)
}

/// Returns true if an `If-None-Match` header value matches `tag`.
fn matches(if_none_match: &str, tag: &str) -> bool {
    if_none_match.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate == tag || candidate.strip_prefix("W/") == Some(tag)
    })
}

fn if_none_match(headers: &HeaderMap) -> Option<String> {
    headers
        .get(IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Middleware adding an `ETag` to successful `GET` responses and answering
/// `304 Not Modified` when the client already has the current body.
pub async fn shallow_etag(request: Request, next: Next) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }
    let condition = if_none_match(request.headers());

    let response = next.run(request).await;
    if response.status() != StatusCode::OK || response.headers().contains_key(ETAG) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => return ServerError::Internal(e.to_string()).into_response(),
    };

    let tag = entity_tag(&bytes);
    let value = match HeaderValue::from_str(&tag) {
        Ok(value) => value,
        Err(e) => return ServerError::Internal(e.to_string()).into_response(),
    };

    if condition.is_some_and(|c| matches(&c, &tag)) {
        debug!(etag = %tag, "not modified");
        let mut not_modified = Response::new(Body::empty());
        *not_modified.status_mut() = StatusCode::NOT_MODIFIED;
        not_modified.headers_mut().insert(ETAG, value);
        return not_modified;
    }

    parts.headers.insert(ETAG, value);
    Response::from_parts(parts, Body::from(bytes))
}
