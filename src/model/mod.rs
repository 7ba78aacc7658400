//! Data models for the Todo API.
//!
//! The service manages a single entity, [`Todo`].

pub mod todo;

pub use todo::Todo;
