//! Error types for the event store.

use ev_core::CoreError;
use thiserror::Error;

/// Event store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Missing or invalid data-source identifier (S001).
    #[error("[S001] Invalid store configuration: {0}")]
    Configuration(String),

    /// Failed to open or close the database (S002).
    #[error("[S002] Database connection failed: {0}")]
    Connection(String),

    /// A migration script could not be applied (S003).
    #[error("[S003] Migration {script} failed: {message}")]
    Migration { script: String, message: String },

    /// The migration ledger could not be created or read (S004).
    #[error("[S004] Migration ledger unavailable: {0}")]
    Ledger(String),

    /// Lookup matched zero rows (S005).
    #[error("[S005] Event not found: {external_id}")]
    NotFound { external_id: String },

    /// BEGIN / COMMIT / ROLLBACK failure (S006).
    #[error("[S006] Transaction failed: {0}")]
    Transaction(String),

    /// SQL execution error in the record store (S007).
    #[error("[S007] Query failed: {0}")]
    Query(String),

    /// Identifier generator produced an unusable value (S008).
    #[error("[S008] Generated external id is invalid: {0:?}")]
    InvalidExternalId(String),

    /// The operation's cancellation token was triggered (S009).
    #[error("[S009] Operation cancelled")]
    Cancelled,

    /// The store has not been opened, or was already closed (S010).
    #[error("[S010] Store is not open")]
    NotOpen,

    /// Configuration file error from ev-core (S011).
    #[error("[S011] {0}")]
    Core(#[from] CoreError),

    /// DuckDB driver error with preserved source chain (S012).
    #[error("[S012] DuckDB error")]
    DuckDb(#[source] duckdb::Error),
}

/// Result type alias for [`StoreError`].
pub type StoreResult<T> = Result<T, StoreError>;

impl From<duckdb::Error> for StoreError {
    fn from(err: duckdb::Error) -> Self {
        StoreError::DuckDb(err)
    }
}

impl StoreError {
    /// Whether this is the typed miss returned by lookups.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Whether this error came from the migration runner.
    pub fn is_migration(&self) -> bool {
        matches!(self, StoreError::Migration { .. } | StoreError::Ledger(_))
    }

    /// Name of the failing migration script, if any.
    pub fn migration_script(&self) -> Option<&str> {
        match self {
            StoreError::Migration { script, .. } => Some(script),
            _ => None,
        }
    }
}
