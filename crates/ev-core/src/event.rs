//! Event records.

use crate::external_id::ExternalId;
use serde::{Deserialize, Serialize};

/// An event people can attend, as persisted in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Store-assigned id, monotonic by insertion order
    pub id: i64,

    /// Globally unique identifier used for lookups from outside the store
    pub external_id: ExternalId,

    /// Event title
    pub title: String,

    /// Free-form description
    pub description: String,
}

/// Caller-supplied fields for a new event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCreate {
    /// Event title
    pub title: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,
}

impl EventCreate {
    /// Build a create request from a title and description.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}
