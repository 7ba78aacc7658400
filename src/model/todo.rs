//! Todo model.
//!
//! A todo is a pair of free-text fields keyed by a store-generated integer id.

use serde::{Deserialize, Deserializer, Serialize};

/// A todo item.
///
/// The JSON shape is `{ "id": integer, "title": string, "description": string }`.
/// Any field missing from a request body falls back to its default, so a create
/// request may omit `id` entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Store-assigned identifier. Ignored on create.
    ///
    /// A `null` or non-integer value reads as `0`.
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: i64,

    /// Free-text title
    #[serde(default)]
    pub title: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Row-version concurrency token.
    ///
    /// Bumped by the store on every replace. Never serialized and never
    /// accepted from clients.
    #[serde(skip)]
    pub version: i64,
}

impl Todo {
    /// Create an unsaved todo (id and version are assigned by the store).
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: description.into(),
            version: 0,
        }
    }

    #[cfg(test)]
    #[must_use]
    pub(crate) fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    #[cfg(test)]
    #[must_use]
    pub(crate) fn same_content(&self, other: &Self) -> bool {
        self.title == other.title && self.description == other.description
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_i64().unwrap_or(0))
}
