//! Serve command implementation.

use crate::cli::ServeArgs;
use crate::config::{ServerConfig, StoreTarget};
use crate::error::{Error, Result};
use crate::http::{self, AppState};
use crate::storage::{MemoryStorage, SqliteStorage, TodoRepository};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Execute the serve command.
///
/// Blocks until SIGINT/SIGTERM.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the database cannot be
/// opened, or the listener cannot bind.
pub fn execute(args: &ServeArgs, db_path: Option<&Path>) -> Result<()> {
    let config = ServerConfig::resolve(
        args.bind.as_deref(),
        args.base_path.as_deref(),
        db_path,
        args.busy_timeout_ms,
        args.in_memory,
    )?;

    let repo = open_repository(&config.store)?;
    let state = AppState::with_base_path(repo, &config.base_path);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;

    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(config.bind).await?;
        http::serve(listener, state, http::wait_for_shutdown_signal()).await
    })
}

/// Open the repository the configuration points at.
///
/// # Errors
///
/// Returns an error if the SQLite database cannot be opened or created.
pub fn open_repository(store: &StoreTarget) -> Result<Arc<dyn TodoRepository>> {
    match store {
        StoreTarget::Sqlite {
            path,
            busy_timeout_ms,
        } => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let storage = SqliteStorage::open_with_timeout(path, Some(*busy_timeout_ms))?;
            info!(path = %path.display(), "Using SQLite store");
            Ok(Arc::new(storage))
        }
        StoreTarget::Memory => {
            warn!("Using in-memory store; todos are lost on exit");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}
