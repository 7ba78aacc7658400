//! Error types for the Todo API.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - HTTP status mapping for the resource controller
//! - Category-based exit codes for the CLI (2=db, 3=not_found, 4=validation, etc.)
//! - Context-aware recovery hints
//! - Structured JSON bodies for error responses

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Todo API operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Database (exit 2)
    AlreadyInitialized,
    DatabaseError,

    // Not Found (exit 3)
    TodoNotFound,

    // Validation (exit 4)
    IdMismatch,

    // Concurrency (exit 5)
    WriteConflict,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::TodoNotFound => "TODO_NOT_FOUND",
            Self::IdMismatch => "ID_MISMATCH",
            Self::WriteConflict => "WRITE_CONFLICT",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-8).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::AlreadyInitialized | Self::DatabaseError => 2,
            Self::TodoNotFound => 3,
            Self::IdMismatch => 4,
            Self::WriteConflict => 5,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// HTTP status code used when this error reaches the controller boundary.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::TodoNotFound => 404,
            Self::IdMismatch => 400,
            Self::WriteConflict => 409,
            Self::AlreadyInitialized
            | Self::DatabaseError
            | Self::ConfigError
            | Self::IoError
            | Self::JsonError
            | Self::InternalError => 500,
        }
    }

    /// Whether a client may retry the request.
    ///
    /// A write conflict is retryable after re-reading the todo; busy
    /// databases usually clear up on their own.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::WriteConflict | Self::DatabaseError)
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in Todo API operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Already initialized at {path}")]
    AlreadyInitialized { path: PathBuf },

    #[error("Todo not found: {id}")]
    TodoNotFound { id: i64 },

    #[error("Todo id mismatch: path has {path_id}, body has {body_id}")]
    IdMismatch { path_id: i64, body_id: i64 },

    #[error("Write conflict on todo {id}: row changed since it was read")]
    Conflict { id: i64 },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::AlreadyInitialized { .. } => ErrorCode::AlreadyInitialized,
            Self::TodoNotFound { .. } => ErrorCode::TodoNotFound,
            Self::IdMismatch { .. } => ErrorCode::IdMismatch,
            Self::Conflict { .. } => ErrorCode::WriteConflict,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint for API clients and CLI users.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::AlreadyInitialized { path } => Some(format!(
                "Database already exists at {}. Use `--force` to recreate it.",
                path.display()
            )),
            Self::TodoNotFound { id } => Some(format!(
                "No todo with id {id}. Use `GET /todo` to list existing todos."
            )),
            Self::IdMismatch { path_id, .. } => Some(format!(
                "The body `id` must equal the id in the URL. Send \"id\": {path_id}."
            )),
            Self::Conflict { id } => Some(format!(
                "Todo {id} was modified by another request. Fetch it again and retry the update."
            )),
            Self::Database(e) if e.to_string().contains("database is locked") => Some(
                "Another process holds the database lock. Raise --busy-timeout-ms or retry."
                    .to_string(),
            ),
            Self::Config(_) => Some(
                "Check --db, --bind and --base-path (or TODO_DB, TODO_BIND, TODO_BASE_PATH)."
                    .to_string(),
            ),
            Self::Database(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Used as the body of 400/409/500 responses and for `--json` CLI errors.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(Error::TodoNotFound { id: 1 }.error_code().http_status(), 404);
        assert_eq!(
            Error::IdMismatch { path_id: 1, body_id: 2 }
                .error_code()
                .http_status(),
            400
        );
        assert_eq!(Error::Conflict { id: 1 }.error_code().http_status(), 409);
        assert_eq!(Error::Other("boom".into()).error_code().http_status(), 500);
    }

    #[test]
    fn test_exit_codes_by_category() {
        assert_eq!(Error::TodoNotFound { id: 7 }.exit_code(), 3);
        assert_eq!(Error::Config("bad".into()).exit_code(), 7);
        assert_eq!(Error::Other("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_structured_json_includes_hint() {
        let json = Error::Conflict { id: 4 }.to_structured_json();
        assert_eq!(json["error"]["code"], "WRITE_CONFLICT");
        assert_eq!(json["error"]["retryable"], true);
        assert!(json["error"]["hint"].as_str().unwrap().contains("Todo 4"));
    }

    #[test]
    fn test_structured_json_without_hint() {
        let json = Error::Other("boom".into()).to_structured_json();
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(json["error"]["message"], "boom");
        assert!(json["error"].get("hint").is_none());
    }
}
