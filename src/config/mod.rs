//! Configuration management.
//!
//! Resolves the database location, the listen address and the route prefix.
//! Every setting follows the same priority:
//!
//! 1. Explicit CLI flag
//! 2. Environment variable (`TODO_DB`, `TODO_BIND`, `TODO_BASE_PATH`, ...)
//! 3. Built-in default
//!
//! Steps 1 and 2 are handled by clap (`#[arg(env = ...)]`); this module
//! validates the raw values and fills in defaults.

use crate::error::{Error, Result};
use crate::storage::sqlite::DEFAULT_BUSY_TIMEOUT_MS;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Where the server keeps its todos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    /// SQLite database file.
    Sqlite {
        path: PathBuf,
        busy_timeout_ms: u64,
    },
    /// Process-local memory; lost on exit.
    Memory,
}

/// Fully resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Normalized route prefix: empty, or `/segment[/segment...]`.
    pub base_path: String,
    pub store: StoreTarget,
}

impl ServerConfig {
    /// Build a configuration from raw (flag or env) values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the bind address or base path is invalid,
    /// or if no database location can be determined.
    pub fn resolve(
        bind: Option<&str>,
        base_path: Option<&str>,
        db: Option<&Path>,
        busy_timeout_ms: Option<u64>,
        in_memory: bool,
    ) -> Result<Self> {
        let bind = parse_bind(bind.unwrap_or(DEFAULT_BIND))?;
        let base_path = normalize_base_path(base_path.unwrap_or(""))?;

        let store = if in_memory {
            StoreTarget::Memory
        } else {
            let path = resolve_db_path(db).ok_or_else(|| {
                Error::Config("cannot determine database path: no home directory".to_string())
            })?;
            StoreTarget::Sqlite {
                path,
                busy_timeout_ms: busy_timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS),
            }
        };

        Ok(Self {
            bind,
            base_path,
            store,
        })
    }
}

/// Get the global data directory (`~/.todo-api/`).
#[must_use]
pub fn global_data_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".todo-api"))
}

/// Resolve the database path.
///
/// Priority:
/// 1. If `explicit_path` is provided, use it directly
/// 2. `TODO_DB` environment variable
/// 3. Global location: `~/.todo-api/data/todo.db`
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Ok(db_path) = std::env::var("TODO_DB") {
        if !db_path.trim().is_empty() {
            return Some(PathBuf::from(db_path));
        }
    }

    global_data_dir().map(|dir| dir.join("data").join("todo.db"))
}

/// Parse a listen address such as `127.0.0.1:8080` or `[::1]:3000`.
///
/// # Errors
///
/// Returns [`Error::Config`] if the address does not parse.
pub fn parse_bind(raw: &str) -> Result<SocketAddr> {
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("invalid bind address '{raw}': {e}")))
}

/// Normalize a route prefix.
///
/// `""` and `"/"` mean "no prefix". Anything else gets a single leading `/`
/// and loses trailing slashes, so `api/` and `/api` both become `/api`.
///
/// # Errors
///
/// Returns [`Error::Config`] for whitespace or router metacharacters
/// (`:`, `*`, `{`, `}`), which would turn the prefix into a capture.
pub fn normalize_base_path(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }

    if let Some(bad) = trimmed
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, ':' | '*' | '{' | '}' | '?' | '#'))
    {
        return Err(Error::Config(format!(
            "invalid base path '{raw}': character '{bad}' is not allowed"
        )));
    }

    if trimmed.contains("//") {
        return Err(Error::Config(format!(
            "invalid base path '{raw}': empty path segment"
        )));
    }

    Ok(format!("/{trimmed}"))
}
