//! Version command implementation.
//!
//! Reports the package version alongside the storage defaults `serve` would
//! pick up from the current environment.

use crate::config::{DEFAULT_BIND, resolve_db_path};
use crate::error::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct VersionOutput {
    name: &'static str,
    version: &'static str,
    build: &'static str,
    sqlite: &'static str,
    db_path: Option<PathBuf>,
    default_bind: &'static str,
}

impl VersionOutput {
    fn collect(db_path: Option<&Path>) -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            build: if cfg!(debug_assertions) { "dev" } else { "release" },
            sqlite: rusqlite::version(),
            db_path: resolve_db_path(db_path),
            default_bind: DEFAULT_BIND,
        }
    }
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(db_path: Option<&Path>, json: bool) -> Result<()> {
    let output = VersionOutput::collect(db_path);

    if json {
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!(
        "{} {} ({}, SQLite {})",
        output.name, output.version, output.build, output.sqlite
    );
    match &output.db_path {
        Some(path) => println!("  database: {}", path.display()),
        None => println!("  database: <no home directory; pass --db>"),
    }
    println!("  bind:     {}", output.default_bind);
    Ok(())
}
