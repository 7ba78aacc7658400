//! SQLite storage implementation.
//!
//! Writes go through [`SqliteStorage::mutate`], which wraps each operation in
//! an IMMEDIATE transaction so concurrent writers serialize on the database
//! lock rather than failing mid-way.

use crate::error::{Error, Result};
use crate::model::Todo;
use crate::storage::TodoRepository;
use crate::storage::schema::apply_schema;
use rusqlite::{Connection, OptionalExtension, Transaction};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

/// Default busy timeout applied when none is configured.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open a database at the given path.
    ///
    /// Creates the database and applies schema if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a database with an optional busy timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open_with_timeout(path: &Path, timeout_ms: Option<u64>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_millis(
            timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS),
        ))?;

        apply_schema(&conn)?;
        debug!(path = %path.display(), "Opened todo database");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Other("todo database connection poisoned".to_string()))
    }

    /// Execute a write inside an IMMEDIATE transaction.
    ///
    /// Commits when `f` succeeds, rolls back (on drop) when it fails.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails.
    pub fn mutate<F, R>(&self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction) -> Result<R>,
    {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        let result = f(&tx)?;

        tx.commit()?;
        debug!(op, "Committed");
        Ok(result)
    }
}

impl TodoRepository for SqliteStorage {
    fn list(&self) -> Result<Vec<Todo>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, title, description, version FROM todos ORDER BY id")?;

        let todos = stmt
            .query_map([], map_todo_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(todos)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Todo>> {
        let todo = self
            .lock()?
            .query_row(
                "SELECT id, title, description, version FROM todos WHERE id = ?1",
                [id],
                map_todo_row,
            )
            .optional()?;
        Ok(todo)
    }

    fn add(&self, todo: &Todo) -> Result<Todo> {
        self.mutate("add_todo", |tx| {
            tx.execute(
                "INSERT INTO todos (title, description, version) VALUES (?1, ?2, 1)",
                rusqlite::params![todo.title, todo.description],
            )?;

            Ok(Todo {
                id: tx.last_insert_rowid(),
                title: todo.title.clone(),
                description: todo.description.clone(),
                version: 1,
            })
        })
    }

    fn replace(&self, id: i64, todo: &Todo, expected_version: i64) -> Result<()> {
        self.mutate("replace_todo", |tx| {
            let rows = tx.execute(
                "UPDATE todos SET title = ?1, description = ?2, version = version + 1
                 WHERE id = ?3 AND version = ?4",
                rusqlite::params![todo.title, todo.description, id, expected_version],
            )?;

            if rows == 0 {
                return Err(Error::Conflict { id });
            }
            Ok(())
        })
    }

    fn remove(&self, id: i64) -> Result<()> {
        self.mutate("remove_todo", |tx| {
            let rows = tx.execute("DELETE FROM todos WHERE id = ?1", [id])?;

            if rows == 0 {
                return Err(Error::TodoNotFound { id });
            }
            Ok(())
        })
    }

    fn exists(&self, id: i64) -> Result<bool> {
        let found = self
            .lock()?
            .prepare("SELECT 1 FROM todos WHERE id = ?1")?
            .exists([id])?;
        Ok(found)
    }
}

// Helper to map todo rows
fn map_todo_row(row: &rusqlite::Row) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        version: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_memory() {
        let storage = SqliteStorage::open_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_todo_crud() {
        let storage = SqliteStorage::open_memory().unwrap();

        // Create
        let created = storage.add(&Todo::new("Task 1", "Description 1")).unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.version, 1);

        // Read
        let todo = storage.get_by_id(created.id).unwrap().unwrap();
        assert_eq!(todo.title, "Task 1");
        assert_eq!(todo.description, "Description 1");

        // Replace
        let updated = Todo::new("Updated Task", "Updated Description").with_id(created.id);
        storage.replace(created.id, &updated, todo.version).unwrap();
        let todo = storage.get_by_id(created.id).unwrap().unwrap();
        assert_eq!(todo.title, "Updated Task");
        assert_eq!(todo.version, 2);

        // Delete
        storage.remove(created.id).unwrap();
        assert!(storage.get_by_id(created.id).unwrap().is_none());
        assert!(!storage.exists(created.id).unwrap());
    }

    #[test]
    fn test_add_ignores_client_id() {
        let storage = SqliteStorage::open_memory().unwrap();

        let created = storage.add(&Todo::new("a", "b").with_id(99)).unwrap();
        assert_eq!(created.id, 1);
        assert!(storage.get_by_id(99).unwrap().is_none());
    }

    #[test]
    fn test_ids_are_never_reused() {
        let storage = SqliteStorage::open_memory().unwrap();

        let first = storage.add(&Todo::new("a", "")).unwrap();
        let second = storage.add(&Todo::new("b", "")).unwrap();
        storage.remove(second.id).unwrap();
        let third = storage.add(&Todo::new("c", "")).unwrap();

        assert!(third.id > second.id);
        assert_ne!(third.id, first.id);
    }

    #[test]
    fn test_list_tracks_adds_and_removes() {
        let storage = SqliteStorage::open_memory().unwrap();

        let a = storage.add(&Todo::new("Task 1", "Description 1")).unwrap();
        let b = storage.add(&Todo::new("Task 2", "Description 2")).unwrap();
        let c = storage.add(&Todo::new("Task 3", "Description 3")).unwrap();
        storage.remove(b.id).unwrap();

        let ids: Vec<i64> = storage.list().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
    }

    #[test]
    fn test_replace_with_stale_version_conflicts() {
        let storage = SqliteStorage::open_memory().unwrap();
        let created = storage.add(&Todo::new("a", "b")).unwrap();

        storage
            .replace(created.id, &Todo::new("first", "writer"), created.version)
            .unwrap();
        let err = storage
            .replace(created.id, &Todo::new("second", "writer"), created.version)
            .unwrap_err();
        assert!(matches!(err, Error::Conflict { id } if id == created.id));

        // The losing write left the row untouched
        let todo = storage.get_by_id(created.id).unwrap().unwrap();
        assert_eq!(todo.title, "first");
    }

    #[test]
    fn test_replace_missing_row_conflicts() {
        let storage = SqliteStorage::open_memory().unwrap();

        let err = storage.replace(5, &Todo::new("a", "b"), 1).unwrap_err();
        assert!(matches!(err, Error::Conflict { id: 5 }));
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let storage = SqliteStorage::open_memory().unwrap();

        let err = storage.remove(42).unwrap_err();
        assert!(matches!(err, Error::TodoNotFound { id: 42 }));
    }

    #[test]
    fn test_open_on_disk_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo.db");

        {
            let storage = SqliteStorage::open(&path).unwrap();
            storage.add(&Todo::new("persisted", "row")).unwrap();
        }

        let storage = SqliteStorage::open_with_timeout(&path, Some(100)).unwrap();
        let todos = storage.list().unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].title, "persisted");
    }
}
