//! HTTP resource controller.
//!
//! Routes (all under the configurable base path):
//!
//! | Method | Path         | Handler                     |
//! |--------|--------------|-----------------------------|
//! | GET    | `/todo`      | [`handlers::list_todos`]    |
//! | GET    | `/todo/:id`  | [`handlers::get_todo`]      |
//! | POST   | `/todo`      | [`handlers::create_todo`]   |
//! | PUT    | `/todo/:id`  | [`handlers::update_todo`]   |
//! | DELETE | `/todo/:id`  | [`handlers::delete_todo`]   |
//!
//! `GET /healthz` sits outside the base path.

pub mod handlers;
mod request_tracing;
mod response;

use crate::storage::TodoRepository;
use axum::Router;
use axum::middleware::from_fn;
use axum::routing::get;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn TodoRepository>,
    /// Normalized route prefix, used to build `Location` headers.
    pub base_path: Arc<str>,
}

impl AppState {
    /// Create state with no route prefix.
    #[must_use]
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self::with_base_path(repo, "")
    }

    /// Create state serving the todo routes under `base_path`.
    ///
    /// `base_path` must already be normalized
    /// (see [`normalize_base_path`](crate::config::normalize_base_path)).
    #[must_use]
    pub fn with_base_path(repo: Arc<dyn TodoRepository>, base_path: &str) -> Self {
        Self {
            repo,
            base_path: Arc::from(base_path),
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let todos = Router::new()
        .route(
            "/todo",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/todo/:id",
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        );

    let todos = if state.base_path.is_empty() {
        todos
    } else {
        Router::new().nest(&state.base_path, todos)
    };

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .merge(todos)
        .layer(from_fn(request_tracing::request_tracing_middleware))
        .with_state(state)
}

/// Serve the router on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> crate::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, base_path = %state.base_path, "todo-api listening");
    }
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("todo-api stopped");
    Ok(())
}

/// Resolve on SIGINT or SIGTERM.
pub async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("Shutdown signal received");
}
