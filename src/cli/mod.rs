//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Todo API - CRUD HTTP service for todo items
#[derive(Parser, Debug)]
#[command(name = "todo-api", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: ~/.todo-api/data/todo.db)
    #[arg(long, global = true, env = "TODO_DB")]
    pub db: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit log lines as JSON
    #[arg(
        long,
        global = true,
        env = "TODO_LOG_JSON",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub log_json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),

    /// Create the database and apply the schema
    Init {
        /// Delete an existing database first
        #[arg(long)]
        force: bool,
    },

    /// Print version and the storage defaults `serve` would use
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Listen address (default: 127.0.0.1:8080)
    #[arg(long, env = "TODO_BIND")]
    pub bind: Option<String>,

    /// Route prefix for the todo endpoints, e.g. /api
    #[arg(long, env = "TODO_BASE_PATH")]
    pub base_path: Option<String>,

    /// SQLite busy timeout in milliseconds
    #[arg(long, env = "TODO_BUSY_TIMEOUT_MS")]
    pub busy_timeout_ms: Option<u64>,

    /// Keep todos in memory instead of SQLite (lost on exit)
    #[arg(long)]
    pub in_memory: bool,
}
