//! HTTP handlers.

pub(crate) mod greeting;
pub(crate) mod people;
pub(crate) mod sync;
pub(crate) mod todos;

use crate::error::{ServerError, ServerResult};
use tracing::warn;

/// Runs a store-backed call on the blocking pool.
///
/// File-backed stores write and fsync a snapshot on every change, which must
/// not happen on a runtime worker thread.
pub(crate) async fn blocking<R, E>(
    work: impl FnOnce() -> Result<R, E> + Send + 'static,
) -> ServerResult<R>
where
    R: Send + 'static,
    E: Into<ServerError> + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result.map_err(Into::into),
        Err(e) => {
            warn!("blocking store call failed: {}", e);
            Err(ServerError::Internal(format!("store task failed: {}", e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use patchsync_core::CoreError;

    #[tokio::test]
    async fn blocking_returns_the_call_result() {
        let value = blocking(|| Ok::<_, CoreError>(7)).await.unwrap();
        assert_eq!(value, 7);

        let err = blocking(|| Err::<(), _>(CoreError::not_found("todo", 1)))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[allow(clippy::panic)]
    async fn panicking_call_is_an_internal_error() {
        let err = blocking(|| -> Result<(), CoreError> { panic!("store exploded") })
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::Internal(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
