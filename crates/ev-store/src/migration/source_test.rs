use super::*;

#[test]
fn embedded_bundle_lists_sql_scripts() {
    let names = EmbeddedMigrations.names();
    assert!(names.contains(&"0001_create_events.sql".to_string()));
    assert!(names.iter().all(|n| n.ends_with(".sql")));
}

#[test]
fn embedded_bundle_reads_script_body() {
    let body = EmbeddedMigrations.read("0001_create_events.sql").unwrap();
    assert!(body.contains("CREATE TABLE events"));
}

#[test]
fn embedded_bundle_missing_script_names_it() {
    let err = EmbeddedMigrations.read("9999_nope.sql").unwrap_err();
    assert_eq!(err.migration_script(), Some("9999_nope.sql"));
}

#[test]
fn static_source_keeps_given_order() {
    let source =
        StaticMigrations::from_pairs([("0002_b.sql", "SELECT 2"), ("0001_a.sql", "SELECT 1")]);
    assert_eq!(source.names(), vec!["0002_b.sql", "0001_a.sql"]);
    assert_eq!(source.read("0001_a.sql").unwrap(), "SELECT 1");
}

#[test]
fn static_source_missing_script_is_migration_error() {
    let source = StaticMigrations::default();
    assert!(source.names().is_empty());
    let err = source.read("0001_a.sql").unwrap_err();
    assert!(err.is_migration());
}
