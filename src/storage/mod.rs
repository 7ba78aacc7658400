//! Persistence layer for todos.
//!
//! The resource controller only ever talks to a [`TodoRepository`], so it
//! stays agnostic of the backing store:
//!
//! - [`sqlite`] - SQLite storage with an identity column and row versions
//! - [`memory`] - In-process storage with the same semantics
//! - [`schema`] - Database schema definitions

pub mod memory;
pub mod schema;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use crate::error::Result;
use crate::model::Todo;

/// Repository over the todo table.
///
/// Implementations are synchronous; the HTTP layer runs them on blocking
/// worker threads. All methods take `&self` and synchronize internally.
pub trait TodoRepository: Send + Sync + 'static {
    /// All stored todos, ascending by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list(&self) -> Result<Vec<Todo>>;

    /// The todo with the given id, or `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get_by_id(&self, id: i64) -> Result<Option<Todo>>;

    /// Insert a todo, ignoring its `id`, and return it as persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn add(&self, todo: &Todo) -> Result<Todo>;

    /// Overwrite title and description of todo `id`.
    ///
    /// The write only applies while the stored version equals
    /// `expected_version`; the version is bumped on success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`](crate::Error::Conflict) if the row was
    /// modified or removed since `expected_version` was read.
    fn replace(&self, id: i64, todo: &Todo, expected_version: i64) -> Result<()>;

    /// Delete todo `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TodoNotFound`](crate::Error::TodoNotFound) if absent.
    fn remove(&self, id: i64) -> Result<()>;

    /// Whether a todo with the given id is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn exists(&self, id: i64) -> Result<bool> {
        Ok(self.get_by_id(id)?.is_some())
    }
}
