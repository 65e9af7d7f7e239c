//! Schema migrations for the event store.
//!
//! - [`source`] — Where migration scripts come from (embedded bundle or static list)
//! - [`runner`] — Applies pending scripts and records them in the ledger

pub mod runner;
pub mod source;

pub use runner::{
    applied_migrations, migration_status, run_migrations, MigrationReport, MigrationStatus,
    LEDGER_TABLE,
};
pub use source::{EmbeddedMigrations, MigrationScript, MigrationSource, StaticMigrations};
