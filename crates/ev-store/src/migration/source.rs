//! Migration sources.
//!
//! A source is a fixed set of named SQL scripts resolved at build time.
//! Names sort lexicographically into execution order, so scripts use a
//! zero-padded prefix (`0001_`, `0002_`, ...).

use crate::error::{StoreError, StoreResult};
use rust_embed::RustEmbed;

/// A single named migration script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationScript {
    /// Unique, sortable script name (e.g. `0001_create_events.sql`).
    pub name: String,
    /// One or more SQL statements.
    pub body: String,
}

impl MigrationScript {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }
}

/// Read-only collection of migration scripts.
pub trait MigrationSource {
    /// List every script name. Order is unspecified; the runner sorts.
    fn names(&self) -> Vec<String>;

    /// Read the body of the script called `name`.
    fn read(&self, name: &str) -> StoreResult<String>;
}

/// Scripts from `migrations/*.sql`, compiled into the binary.
#[derive(RustEmbed)]
#[folder = "migrations/"]
struct Bundle;

/// The migration bundle shipped with this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedMigrations;

impl MigrationSource for EmbeddedMigrations {
    fn names(&self) -> Vec<String> {
        Bundle::iter()
            .filter(|name| name.ends_with(".sql"))
            .map(|name| name.into_owned())
            .collect()
    }

    fn read(&self, name: &str) -> StoreResult<String> {
        let file = Bundle::get(name).ok_or_else(|| StoreError::Migration {
            script: name.to_string(),
            message: "script is not in the embedded bundle".to_string(),
        })?;
        String::from_utf8(file.data.into_owned()).map_err(|e| StoreError::Migration {
            script: name.to_string(),
            message: format!("script is not valid UTF-8: {e}"),
        })
    }
}

/// An in-memory list of scripts, kept in the order they were given.
///
/// Useful for embedders that inline scripts with `include_str!`.
#[derive(Debug, Clone, Default)]
pub struct StaticMigrations {
    scripts: Vec<MigrationScript>,
}

impl StaticMigrations {
    pub fn new(scripts: impl IntoIterator<Item = MigrationScript>) -> Self {
        Self {
            scripts: scripts.into_iter().collect(),
        }
    }

    /// Build from `(name, body)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(name, body)| MigrationScript::new(name, body)),
        )
    }
}

impl MigrationSource for StaticMigrations {
    fn names(&self) -> Vec<String> {
        self.scripts.iter().map(|s| s.name.clone()).collect()
    }

    fn read(&self, name: &str) -> StoreResult<String> {
        self.scripts
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.body.clone())
            .ok_or_else(|| StoreError::Migration {
                script: name.to_string(),
                message: "script not found in source".to_string(),
            })
    }
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
