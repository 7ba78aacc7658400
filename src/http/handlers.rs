//! Todo endpoint handlers.
//!
//! Repository calls are synchronous, so each handler hands its store work to
//! a blocking worker and awaits the result.

use crate::error::{Error, Result};
use crate::http::AppState;
use crate::model::Todo;
use crate::storage::TodoRepository;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Run `f` against the repository on a blocking worker thread.
async fn with_repo<T, F>(state: &AppState, f: F) -> Result<T>
where
    F: FnOnce(&dyn TodoRepository) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let repo = Arc::clone(&state.repo);
    tokio::task::spawn_blocking(move || f(repo.as_ref()))
        .await
        .map_err(|e| Error::Other(format!("storage task failed: {e}")))?
}

/// `GET /healthz`
pub async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// `GET /todo`
pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>> {
    let todos = with_repo(&state, |repo| repo.list()).await?;
    debug!(count = todos.len(), "Listed todos");
    Ok(Json(todos))
}

/// `GET /todo/:id`
pub async fn get_todo(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Todo>> {
    with_repo(&state, move |repo| repo.get_by_id(id))
        .await?
        .map(Json)
        .ok_or(Error::TodoNotFound { id })
}

/// `POST /todo`
///
/// Any `id` in the body is ignored; the store assigns one.
pub async fn create_todo(
    State(state): State<AppState>,
    Json(todo): Json<Todo>,
) -> Result<impl IntoResponse> {
    let created = with_repo(&state, move |repo| repo.add(&todo)).await?;
    info!(id = created.id, "Created todo");

    let location = format!("{}/todo/{}", state.base_path, created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

/// `PUT /todo/:id`
///
/// The body replaces the stored title and description. Its `id` must match
/// the path.
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(todo): Json<Todo>,
) -> Result<StatusCode> {
    if todo.id != id {
        debug!(path_id = id, body_id = todo.id, "Rejected update with mismatched id");
        return Err(Error::IdMismatch {
            path_id: id,
            body_id: todo.id,
        });
    }

    with_repo(&state, move |repo| replace_checked(repo, id, &todo)).await?;
    info!(id, "Updated todo");
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /todo/:id`
pub async fn delete_todo(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    with_repo(&state, move |repo| {
        if !repo.exists(id)? {
            return Err(Error::TodoNotFound { id });
        }
        repo.remove(id)
    })
    .await?;
    info!(id, "Deleted todo");
    Ok(StatusCode::NO_CONTENT)
}

/// Replace todo `id`, guarding against concurrent writers.
///
/// Reads the current version, then writes conditioned on it. A conflict on a
/// row that has since been deleted is reported as not found; a conflict on a
/// row that still exists surfaces as [`Error::Conflict`].
///
/// # Errors
///
/// [`Error::TodoNotFound`] if the row is missing before or after the write,
/// [`Error::Conflict`] if another writer changed it in between.
pub fn replace_checked(repo: &dyn TodoRepository, id: i64, todo: &Todo) -> Result<()> {
    let original = repo.get_by_id(id)?.ok_or(Error::TodoNotFound { id })?;

    match repo.replace(id, todo, original.version) {
        Err(Error::Conflict { .. }) => {
            if repo.exists(id)? {
                warn!(id, version = original.version, "Write conflict on live todo");
                Err(Error::Conflict { id })
            } else {
                debug!(id, "Todo vanished during update");
                Err(Error::TodoNotFound { id })
            }
        }
        other => other,
    }
}
