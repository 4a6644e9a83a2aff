//! Router assembly and the serve loop.

use crate::api::{greeting, people, sync, todos};
use crate::error::ServerResult;
use crate::etag::shallow_etag;
use crate::state::AppState;
use axum::middleware;
use axum::routing::{get, put};
use axum::Router;
use patchsync_core::{Person, Todo};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Builds the HTTP router over the given state.
///
/// # Example
///
/// ```
/// use patchsync_server::{build_router, AppState, ServerConfig};
///
/// let state = AppState::in_memory(ServerConfig::default()).unwrap();
/// let _router = build_router(state);
/// ```
pub fn build_router(state: AppState) -> Router {
    let etag = state.config().etag;

    let router = Router::new()
        .route(
            "/todos",
            get(todos::list)
                .post(todos::create)
                .patch(sync::patch_collection::<Todo>),
        )
        .route(
            "/todos/{id}",
            put(todos::update)
                .delete(todos::remove)
                .patch(sync::patch_entity::<Todo>),
        )
        .route(
            "/people",
            get(people::list)
                .post(people::create)
                .patch(sync::patch_collection::<Person>),
        )
        .route(
            "/people/{id}",
            get(people::get)
                .put(people::update)
                .delete(people::remove)
                .patch(sync::patch_entity::<Person>),
        )
        .route("/people/search/findByEmail", get(people::find_by_email))
        .route("/hi/{name}", get(greeting::hi));

    let router = if etag {
        router.layer(middleware::from_fn(shallow_etag))
    } else {
        router
    };
    router.with_state(state)
}

/// Serves `state` on `listener` until `shutdown` resolves.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> ServerResult<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, "listening");
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("server stopped");
    Ok(())
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn serve(state: AppState) -> ServerResult<()> {
    let listener = TcpListener::bind(state.config().bind_addr).await?;
    serve_with_shutdown(listener, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => warn!(error = %e, "cannot listen for ctrl-c; shutting down"),
    }
}
