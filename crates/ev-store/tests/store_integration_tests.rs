//! Integration tests for the event store.
//!
//! These tests go through the public ev-store API only: open a store
//! (in memory or on disk), let it migrate, then create, find, and list
//! events across close/reopen cycles.

use ev_core::{Config, EventCreate};
use ev_store::{
    applied_migrations, run_migrations, EmbeddedMigrations, EventStore, MigrationSource,
    StaticMigrations, StoreDb, StoreError,
};

// ── Helpers ────────────────────────────────────────────────────────────

fn must_open(dsn: &str) -> StoreDb {
    StoreDb::connect(dsn).unwrap()
}

fn must_close(mut db: StoreDb) {
    db.close().unwrap();
}

fn bundled_names() -> Vec<String> {
    let mut names = EmbeddedMigrations.names();
    names.sort();
    names
}

// ── Tests ──────────────────────────────────────────────────────────────

#[test]
fn open_and_close_memory_store() {
    let db = must_open(":memory:");
    must_close(db);
}

#[test]
fn fresh_store_has_one_ledger_entry_per_script() {
    let db = must_open(":memory:");
    let applied = applied_migrations(db.conn().unwrap()).unwrap();
    assert_eq!(applied, bundled_names());
    must_close(db);
}

#[test]
fn first_event_scenario() {
    let db = must_open(":memory:");
    assert_eq!(
        applied_migrations(db.conn().unwrap()).unwrap(),
        vec!["0001_create_events.sql"]
    );

    let store = EventStore::new(&db).with_generator(|| "abcd".to_string());
    let token = db.cancellation_token();
    let event = store
        .create(&token, &EventCreate::new("First event", "desc"))
        .unwrap();

    assert_eq!(event.id, 1);
    assert_eq!(event.external_id, "abcd");
    assert_eq!(event.title, "First event");
    assert_eq!(event.description, "desc");

    drop(store);
    must_close(db);
}

#[test]
fn events_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store").join("events.duckdb");
    let dsn = path.to_string_lossy().to_string();

    let created = {
        let db = must_open(&dsn);
        let token = db.cancellation_token();
        let event = EventStore::new(&db)
            .create(&token, &EventCreate::new("Persisted", "on disk"))
            .unwrap();
        must_close(db);
        event
    };

    let mut db = StoreDb::new(dsn);
    let report = db.open().unwrap();
    assert!(report.applied.is_empty(), "reopen must not re-run scripts");

    let token = db.cancellation_token();
    let store = EventStore::new(&db);
    let found = store
        .find_by_external_id(&token, created.external_id.as_str())
        .unwrap();
    assert_eq!(found, created);
    assert_eq!(store.list_all(&token).unwrap(), vec![created]);
}

#[test]
fn store_opened_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("data").join("events.duckdb");
    std::fs::write(
        dir.path().join("evstore.yml"),
        format!("database:\n  path: {:?}\n", db_path.to_string_lossy()),
    )
    .unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    let db = StoreDb::from_config(&config.database).unwrap();
    assert!(db.is_open());
    assert!(db_path.exists());
    must_close(db);
}

#[test]
fn migration_runner_is_idempotent_on_open_store() {
    let db = must_open(":memory:");
    let conn = db.conn().unwrap();
    let report = run_migrations(conn, &EmbeddedMigrations).unwrap();
    assert!(report.applied.is_empty());
    assert_eq!(report.skipped, bundled_names());
    assert_eq!(applied_migrations(conn).unwrap(), bundled_names());
}

#[test]
fn custom_source_failure_is_fatal_to_open() {
    let mut db = StoreDb::new(":memory:");
    let source = StaticMigrations::from_pairs([
        ("0001_ok.sql", "CREATE TABLE ok (id INTEGER);"),
        ("0002_broken.sql", "CREATE TABLE broken (id INTEGER); DROP TABLE missing;"),
    ]);

    let err = db.open_with(&source).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Migration { ref script, .. } if script == "0002_broken.sql"
    ));
    assert!(!db.is_open());
    db.close().unwrap();
}

#[test]
fn not_found_is_a_typed_miss() {
    let db = must_open(":memory:");
    let token = db.cancellation_token();
    let err = EventStore::new(&db)
        .find_by_external_id(&token, "does-not-exist")
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("does-not-exist"));
}
