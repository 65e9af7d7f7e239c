//! External event identifiers and the capability that generates them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

const EMPTY_ID: &str = "external id must not be empty";

/// Caller-facing identifier of an event, never empty.
///
/// Separate from the store-assigned integer id. The store treats the text
/// as opaque and relies on the `events.uuid` unique constraint for
/// uniqueness. Serialized as a plain string; deserializing `""` fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExternalId(String);

impl ExternalId {
    /// Wrap `id`, or `None` when it is empty.
    pub fn try_new(id: impl Into<String>) -> Option<Self> {
        Self::try_from(id.into()).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ExternalId {
    type Error = &'static str;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        if id.is_empty() {
            return Err(EMPTY_ID);
        }
        Ok(Self(id))
    }
}

impl From<ExternalId> for String {
    fn from(id: ExternalId) -> Self {
        id.0
    }
}

impl Deref for ExternalId {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<&str> for ExternalId {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Produces fresh external identifiers for new events.
///
/// Implementations must return values that are unique with overwhelming
/// probability. Any `Fn() -> String` closure is a generator, which keeps
/// deterministic stubs in tests to a one-liner.
pub trait ExternalIdGenerator: Send + Sync {
    /// Generate the next identifier.
    fn generate(&self) -> String;
}

impl<F> ExternalIdGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn generate(&self) -> String {
        self()
    }
}

/// Default generator: random (v4) UUIDs in hyphenated form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV4Generator;

impl ExternalIdGenerator for UuidV4Generator {
    fn generate(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
#[path = "external_id_test.rs"]
mod tests;
