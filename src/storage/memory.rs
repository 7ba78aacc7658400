//! In-process storage backend.
//!
//! Mirrors the SQLite semantics (monotonic ids, row versions) on top of a
//! `BTreeMap`, so `list` comes back in ascending id order. Nothing survives a
//! restart.

use crate::error::{Error, Result};
use crate::model::Todo;
use crate::storage::TodoRepository;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, Todo>,
    last_id: i64,
}

/// Memory-backed storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    table: Mutex<Table>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table>> {
        self.table
            .lock()
            .map_err(|_| Error::Other("todo table poisoned".to_string()))
    }
}

impl TodoRepository for MemoryStorage {
    fn list(&self) -> Result<Vec<Todo>> {
        Ok(self.lock()?.rows.values().cloned().collect())
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Todo>> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    fn add(&self, todo: &Todo) -> Result<Todo> {
        let mut table = self.lock()?;
        table.last_id += 1;
        let stored = Todo {
            id: table.last_id,
            title: todo.title.clone(),
            description: todo.description.clone(),
            version: 1,
        };
        table.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn replace(&self, id: i64, todo: &Todo, expected_version: i64) -> Result<()> {
        let mut table = self.lock()?;
        match table.rows.get_mut(&id) {
            Some(row) if row.version == expected_version => {
                row.title.clone_from(&todo.title);
                row.description.clone_from(&todo.description);
                row.version += 1;
                Ok(())
            }
            _ => Err(Error::Conflict { id }),
        }
    }

    fn remove(&self, id: i64) -> Result<()> {
        self.lock()?
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::TodoNotFound { id })
    }

    fn exists(&self, id: i64) -> Result<bool> {
        Ok(self.lock()?.rows.contains_key(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_crud() {
        let storage = MemoryStorage::new();

        let created = storage.add(&Todo::new("Task 1", "Description 1")).unwrap();
        assert_eq!(created.id, 1);

        let todo = storage.get_by_id(1).unwrap().unwrap();
        assert!(todo.same_content(&created));

        storage
            .replace(1, &Todo::new("Updated Task", "Updated Description"), 1)
            .unwrap();
        let todo = storage.get_by_id(1).unwrap().unwrap();
        assert_eq!(todo.description, "Updated Description");
        assert_eq!(todo.version, 2);

        storage.remove(1).unwrap();
        assert!(storage.get_by_id(1).unwrap().is_none());
    }

    #[test]
    fn test_ids_are_never_reused() {
        let storage = MemoryStorage::new();

        let a = storage.add(&Todo::new("a", "")).unwrap();
        storage.remove(a.id).unwrap();
        let b = storage.add(&Todo::new("b", "")).unwrap();

        assert_eq!(b.id, a.id + 1);
    }

    #[test]
    fn test_list_is_ordered_by_id() {
        let storage = MemoryStorage::new();
        for title in ["x", "y", "z"] {
            storage.add(&Todo::new(title, "")).unwrap();
        }

        let titles: Vec<String> = storage.list().unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_replace_conflicts() {
        let storage = MemoryStorage::new();
        let created = storage.add(&Todo::new("a", "b")).unwrap();

        assert!(matches!(
            storage.replace(created.id, &Todo::new("c", "d"), 7),
            Err(Error::Conflict { .. })
        ));
        assert!(matches!(
            storage.replace(created.id + 1, &Todo::new("c", "d"), 1),
            Err(Error::Conflict { .. })
        ));
        assert_eq!(storage.get_by_id(created.id).unwrap().unwrap().title, "a");
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let storage = MemoryStorage::new();
        assert!(matches!(
            storage.remove(3),
            Err(Error::TodoNotFound { id: 3 })
        ));
    }
}
