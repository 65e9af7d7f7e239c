//! Schema migration runner.
//!
//! Tracks applied script names in the `schema_migrations` ledger and applies
//! any script missing from it. Scripts run in lexicographic name order, each
//! inside its own transaction together with its ledger insert, so a script
//! is either applied and recorded or neither.

use super::source::MigrationSource;
use crate::error::{StoreError, StoreResult};
use crate::transaction::Tx;
use duckdb::Connection;

/// Ledger table holding one row per applied script.
pub const LEDGER_TABLE: &str = "schema_migrations";

/// Outcome of one [`run_migrations`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Scripts executed and recorded during this run, in order.
    pub applied: Vec<String>,
    /// Scripts already present in the ledger.
    pub skipped: Vec<String>,
}

/// Ledger state compared to a source, without applying anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Names recorded in the ledger, sorted.
    pub applied: Vec<String>,
    /// Source scripts not yet in the ledger, in execution order.
    pub pending: Vec<String>,
}

impl MigrationStatus {
    pub fn is_up_to_date(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Ensure the ledger table exists.
fn ensure_ledger(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {LEDGER_TABLE} (name VARCHAR PRIMARY KEY);"
    ))
    .map_err(|e| StoreError::Ledger(format!("failed to create {LEDGER_TABLE} table: {e}")))
}

fn ledger_exists(conn: &Connection) -> StoreResult<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
            duckdb::params![LEDGER_TABLE],
            |row| row.get(0),
        )
        .map_err(|e| StoreError::Ledger(format!("failed to inspect catalog: {e}")))?;
    Ok(count > 0)
}

/// List the source's script names in execution order.
///
/// Rejects duplicate names, since the ledger could not tell them apart.
fn ordered_names(source: &dyn MigrationSource) -> StoreResult<Vec<String>> {
    let mut names = source.names();
    names.sort();
    if let Some(dup) = names.windows(2).find(|w| w[0] == w[1]) {
        return Err(StoreError::Migration {
            script: dup[0].clone(),
            message: "duplicate script name in migration source".to_string(),
        });
    }
    Ok(names)
}

fn is_recorded(tx: &Tx<'_>, name: &str) -> duckdb::Result<bool> {
    let count: i64 = tx.query_row(
        &format!("SELECT COUNT(*) FROM {LEDGER_TABLE} WHERE name = ?"),
        duckdb::params![name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn script_error(name: &str, what: &str, err: impl std::fmt::Display) -> StoreError {
    StoreError::Migration {
        script: name.to_string(),
        message: format!("{what}: {err}"),
    }
}

/// Apply one script if the ledger does not have it yet.
///
/// Returns `true` when the script was executed and recorded.
fn apply_script(
    conn: &Connection,
    source: &dyn MigrationSource,
    name: &str,
) -> StoreResult<bool> {
    let tx = Tx::begin(conn).map_err(|e| script_error(name, "begin", e))?;

    if is_recorded(&tx, name).map_err(|e| script_error(name, "ledger lookup", e))? {
        tx.rollback().map_err(|e| script_error(name, "release", e))?;
        return Ok(false);
    }

    // Dropping `tx` on any early return below rolls the script back.
    let body = source.read(name)?;
    if !body.trim().is_empty() {
        tx.execute_batch(&body)
            .map_err(|e| script_error(name, "execute", e))?;
    }

    tx.execute(
        &format!("INSERT INTO {LEDGER_TABLE} (name) VALUES (?)"),
        duckdb::params![name],
    )
    .map_err(|e| script_error(name, "record", e))?;

    tx.commit().map_err(|e| script_error(name, "commit", e))?;
    Ok(true)
}

/// Apply every pending script from `source` against `conn`.
///
/// Stops at the first failing script; scripts before it stay applied and
/// the failing one leaves no trace. Safe to call again after a failure.
pub fn run_migrations(
    conn: &Connection,
    source: &dyn MigrationSource,
) -> StoreResult<MigrationReport> {
    ensure_ledger(conn)?;
    let names = ordered_names(source)?;

    let mut report = MigrationReport::default();
    for name in names {
        if apply_script(conn, source, &name)? {
            log::debug!("Applied migration {name}");
            report.applied.push(name);
        } else {
            report.skipped.push(name);
        }
    }

    if !report.applied.is_empty() {
        log::info!(
            "Applied {} migration(s), {} already up to date",
            report.applied.len(),
            report.skipped.len()
        );
    }
    Ok(report)
}

/// Names recorded in the ledger, sorted. Empty if the ledger does not exist.
pub fn applied_migrations(conn: &Connection) -> StoreResult<Vec<String>> {
    if !ledger_exists(conn)? {
        return Ok(Vec::new());
    }

    let mut stmt = conn
        .prepare(&format!("SELECT name FROM {LEDGER_TABLE}"))
        .map_err(|e| StoreError::Ledger(format!("prepare ledger read: {e}")))?;
    let mut names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| StoreError::Ledger(format!("query ledger: {e}")))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StoreError::Ledger(format!("collect ledger: {e}")))?;
    names.sort();
    Ok(names)
}

/// Compare the ledger to `source` without applying anything.
pub fn migration_status(
    conn: &Connection,
    source: &dyn MigrationSource,
) -> StoreResult<MigrationStatus> {
    let applied = applied_migrations(conn)?;
    let pending = ordered_names(source)?
        .into_iter()
        .filter(|name| applied.binary_search(name).is_err())
        .collect();
    Ok(MigrationStatus { applied, pending })
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
