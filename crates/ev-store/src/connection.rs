//! Store connection manager.
//!
//! [`StoreDb`] owns the DuckDB [`Connection`] and a [`CancellationToken`]
//! scoped to its lifetime. Opening the store applies pending migrations
//! before the handle becomes usable; closing it cancels the token and
//! releases the connection.

use crate::error::{StoreError, StoreResult};
use crate::migration::{
    migration_status, run_migrations, EmbeddedMigrations, MigrationReport, MigrationSource,
    MigrationStatus,
};
use crate::transaction::Tx;
use duckdb::Connection;
use ev_core::config::{is_memory_dsn, Config, DatabaseConfig, MEMORY_DSN};
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Wrapper around a DuckDB connection to the event database.
///
/// Single-threaded: the connection is not `Sync`, so each thread that needs
/// the store opens its own `StoreDb`.
pub struct StoreDb {
    dsn: String,
    conn: Option<Connection>,
    cancel: CancellationToken,
}

impl StoreDb {
    /// Create an unopened manager for `dsn` (a file path or `:memory:`).
    ///
    /// Surrounding whitespace is dropped.
    pub fn new(dsn: impl Into<String>) -> Self {
        let dsn: String = dsn.into();
        Self {
            dsn: dsn.trim().to_string(),
            conn: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Create and open a store for `dsn` in one step.
    pub fn connect(dsn: impl Into<String>) -> StoreResult<Self> {
        let mut db = Self::new(dsn);
        db.open()?;
        Ok(db)
    }

    /// Create an in-memory store with all migrations applied.
    ///
    /// Useful for unit tests that don't need persistence.
    pub fn open_memory() -> StoreResult<Self> {
        Self::connect(MEMORY_DSN)
    }

    /// Create and open a store from resolved configuration.
    pub fn from_config(config: &DatabaseConfig) -> StoreResult<Self> {
        Self::connect(config.path.clone())
    }

    /// Load `evstore.yml` from `dir`, apply the CLI / `EV_DATABASE`
    /// overrides, and open the resulting database.
    pub fn from_config_dir(dir: &Path, cli_path: Option<&str>) -> StoreResult<Self> {
        let config = Config::load_from_dir(dir)?;
        Self::from_config(&config.resolve_database(cli_path))
    }

    /// The data-source identifier this manager was created with.
    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    /// Whether the store has been opened and not yet closed.
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Open the database and apply the embedded migrations.
    pub fn open(&mut self) -> StoreResult<MigrationReport> {
        self.open_with(&EmbeddedMigrations)
    }

    /// Open the database and apply migrations from `source`.
    ///
    /// If migration fails the connection is dropped and the manager stays
    /// unopened.
    pub fn open_with(&mut self, source: &dyn MigrationSource) -> StoreResult<MigrationReport> {
        if self.conn.is_some() {
            return Err(StoreError::Connection(format!(
                "{} is already open",
                self.dsn
            )));
        }
        if self.cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }

        let conn = self.establish()?;
        let report = run_migrations(&conn, source)?;
        log::debug!(
            "Opened {} ({} migration(s) applied)",
            self.dsn,
            report.applied.len()
        );
        self.conn = Some(conn);
        Ok(report)
    }

    fn establish(&self) -> StoreResult<Connection> {
        if self.dsn.is_empty() {
            return Err(StoreError::Configuration("DSN required".to_string()));
        }

        if is_memory_dsn(&self.dsn) {
            return Connection::open_in_memory()
                .map_err(|e| StoreError::Connection(e.to_string()));
        }

        let path = Path::new(&self.dsn);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_private_dir(parent).map_err(|e| {
                StoreError::Connection(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        Connection::open(path)
            .map_err(|e| StoreError::Connection(format!("{e}: {}", path.display())))
    }

    /// Cancel in-flight work and release the connection.
    ///
    /// A no-op on a manager that was never opened, and safe to repeat.
    pub fn close(&mut self) -> StoreResult<()> {
        self.cancel.cancel();

        match self.conn.take() {
            Some(conn) => {
                conn.close()
                    .map_err(|(_, e)| StoreError::Connection(format!("close failed: {e}")))?;
                log::debug!("Closed {}", self.dsn);
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// A token cancelled when this store closes.
    ///
    /// Callers may cancel it (or a child of it) to abort their own
    /// operations without closing the store.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> StoreResult<&Connection> {
        self.conn.as_ref().ok_or(StoreError::NotOpen)
    }

    /// Borrow the connection for an operation governed by `cancel`.
    pub(crate) fn checked_conn(&self, cancel: &CancellationToken) -> StoreResult<&Connection> {
        if cancel.is_cancelled() || self.cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        self.conn()
    }

    /// Begin a transaction. Dropping the returned guard without committing
    /// rolls it back.
    pub fn begin_tx(&self, cancel: &CancellationToken) -> StoreResult<Tx<'_>> {
        Tx::begin(self.checked_conn(cancel)?)
    }

    /// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
    /// error.
    pub fn transaction<F, T>(&self, cancel: &CancellationToken, body: F) -> StoreResult<T>
    where
        F: FnOnce(&Tx<'_>) -> StoreResult<T>,
    {
        let tx = self.begin_tx(cancel)?;
        let value = body(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Applied and pending scripts of the embedded bundle.
    pub fn migration_status(&self) -> StoreResult<MigrationStatus> {
        migration_status(self.conn()?, &EmbeddedMigrations)
    }
}

impl Drop for StoreDb {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;
