//! Todo API - CRUD HTTP service for todo items.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Configuration resolution (flags, environment, defaults)
//! - [`http`] - axum resource controller for `/todo`
//! - [`model`] - The `Todo` entity
//! - [`storage`] - Repository trait with SQLite and in-memory backends
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod storage;

pub use error::{Error, Result};

/// Global quiet flag for `--quiet`.
///
/// When set, commands print nothing on success. Avoids threading a `quiet`
/// bool through every handler signature.
pub static QUIET: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Check if quiet mode is active.
#[inline]
pub fn is_quiet() -> bool {
    QUIET.load(std::sync::atomic::Ordering::Relaxed)
}
