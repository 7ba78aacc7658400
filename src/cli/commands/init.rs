//! Create the todo database.
//!
//! The server applies the schema on every open, so `init` is optional; it
//! exists to provision the file (and its directory) ahead of time.

use crate::config::resolve_db_path;
use crate::error::{Error, Result};
use crate::storage::{SqliteStorage, TodoRepository};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Serialize)]
struct InitOutput {
    database: PathBuf,
    todos: usize,
}

/// Execute the init command.
///
/// # Errors
///
/// Returns [`Error::AlreadyInitialized`] if the database exists and `force`
/// is not set, or an error if the directory or database cannot be created.
pub fn execute(db_path: Option<&Path>, force: bool, json: bool) -> Result<()> {
    let db_path = resolve_db_path(db_path).ok_or_else(|| {
        Error::Config("Could not determine database location".to_string())
    })?;

    if db_path.exists() {
        if !force {
            return Err(Error::AlreadyInitialized { path: db_path });
        }
        remove_database_files(&db_path)?;
    }

    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let storage = SqliteStorage::open(&db_path)?;
    let todos = storage.list()?.len();
    info!(path = %db_path.display(), "Initialized todo database");

    if json {
        let output = InitOutput {
            database: db_path,
            todos,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if !crate::is_quiet() {
        println!("Initialized todo database");
        println!("  Database: {}", db_path.display());
    }

    Ok(())
}

/// Remove a database file along with its WAL sidecars.
fn remove_database_files(db_path: &Path) -> Result<()> {
    fs::remove_file(db_path)?;
    for suffix in ["-wal", "-shm"] {
        let mut sidecar = db_path.as_os_str().to_owned();
        sidecar.push(suffix);
        let sidecar = PathBuf::from(sidecar);
        if sidecar.exists() {
            fs::remove_file(sidecar)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Todo;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_database_and_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("todo.db");

        execute(Some(&path), false, true).unwrap();

        assert!(path.exists());
        let storage = SqliteStorage::open(&path).unwrap();
        assert!(storage.list().unwrap().is_empty());
    }

    #[test]
    fn test_init_fails_if_already_initialized() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todo.db");

        execute(Some(&path), false, true).unwrap();
        let result = execute(Some(&path), false, true);
        assert!(matches!(result, Err(Error::AlreadyInitialized { .. })));
    }

    #[test]
    fn test_init_force_recreates_empty_database() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todo.db");

        execute(Some(&path), false, true).unwrap();
        {
            let storage = SqliteStorage::open(&path).unwrap();
            storage.add(&Todo::new("old", "row")).unwrap();
        }

        execute(Some(&path), true, true).unwrap();
        let storage = SqliteStorage::open(&path).unwrap();
        assert!(storage.list().unwrap().is_empty());
    }
}
