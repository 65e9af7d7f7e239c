//! Transaction guard over a DuckDB connection.
//!
//! DuckDB's own `Transaction` type needs `&mut Connection`; [`Tx`] issues
//! `BEGIN` / `COMMIT` / `ROLLBACK` by hand so it works through a shared
//! borrow, and rolls back on drop unless it was finished explicitly.

use crate::error::{StoreError, StoreResult};
use duckdb::Connection;
use std::ops::Deref;

/// An open transaction on a borrowed connection.
///
/// Derefs to [`Connection`] so statements run inside the transaction.
pub struct Tx<'conn> {
    conn: &'conn Connection,
    finished: bool,
}

impl<'conn> Tx<'conn> {
    /// Issue `BEGIN TRANSACTION` on `conn`.
    pub fn begin(conn: &'conn Connection) -> StoreResult<Self> {
        conn.execute_batch("BEGIN TRANSACTION")
            .map_err(|e| StoreError::Transaction(format!("BEGIN failed: {e}")))?;
        Ok(Self {
            conn,
            finished: false,
        })
    }

    /// Commit. On failure the transaction is rolled back before the error
    /// is returned.
    pub fn commit(mut self) -> StoreResult<()> {
        self.finished = true;
        if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
            let _ = self.conn.execute_batch("ROLLBACK");
            return Err(StoreError::Transaction(format!(
                "COMMIT failed: {commit_err}"
            )));
        }
        Ok(())
    }

    /// Roll back explicitly.
    pub fn rollback(mut self) -> StoreResult<()> {
        self.finished = true;
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|e| StoreError::Transaction(format!("ROLLBACK failed: {e}")))
    }
}

impl Deref for Tx<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn
    }
}

impl Drop for Tx<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.conn.execute_batch("ROLLBACK") {
            log::warn!("Rollback of abandoned transaction failed: {e}");
        }
    }
}

#[cfg(test)]
#[path = "transaction_test.rs"]
mod tests;
