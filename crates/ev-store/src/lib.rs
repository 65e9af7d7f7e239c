//! Event store for evstore.
//!
//! Provides a DuckDB-backed store for event records. Opening a [`StoreDb`]
//! applies the SQL scripts bundled in `migrations/`, each exactly once and
//! in name order, recording every applied script in the
//! `schema_migrations` ledger table.

pub mod connection;
pub mod error;
pub mod events;
pub mod migration;
pub mod transaction;

pub use connection::StoreDb;
pub use error::{StoreError, StoreResult};
pub use events::EventStore;
pub use migration::{
    applied_migrations, migration_status, run_migrations, EmbeddedMigrations, MigrationReport,
    MigrationScript, MigrationSource, MigrationStatus, StaticMigrations,
};
pub use tokio_util::sync::CancellationToken;
pub use transaction::Tx;
