use super::*;

#[test]
fn test_parse_empty_config_uses_defaults() {
    let config: Config = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config.database.path, "data/events.duckdb");
    assert!(!is_memory_dsn(&config.database.path));
}

#[test]
fn test_parse_memory_database() {
    let yaml = r#"
database:
  path: ":memory:"
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert!(is_memory_dsn(&config.database.path));
}

#[test]
fn test_memory_dsn_ignores_surrounding_whitespace() {
    assert!(is_memory_dsn("  :memory:\n"));
    assert!(!is_memory_dsn("data/:memory:"));
    assert!(!is_memory_dsn(""));
}

#[test]
fn test_unknown_fields_rejected() {
    let yaml = r#"
database:
  path: "./events.duckdb"
  pool_size: 4
"#;
    let result: Result<Config, _> = serde_yaml::from_str(yaml);
    assert!(result.is_err());
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(&dir.path().join("evstore.yml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_from_dir_prefers_yml() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("evstore.yml"),
        "database:\n  path: from_yml.duckdb\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("evstore.yaml"),
        "database:\n  path: from_yaml.duckdb\n",
    )
    .unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.database.path, "from_yml.duckdb");
}

#[test]
fn test_load_from_dir_falls_back_to_yaml() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("evstore.yaml"),
        "database:\n  path: from_yaml.duckdb\n",
    )
    .unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.database.path, "from_yaml.duckdb");
}

#[test]
fn test_load_from_dir_without_config() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_rejects_blank_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("evstore.yml");
    std::fs::write(&path, "database:\n  path: \"  \"\n").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_load_reports_yaml_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("evstore.yml");
    std::fs::write(&path, "database: [unterminated\n").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::YamlParse(_)));
}

// These tests modify environment variables and must run serially
use serial_test::serial;

#[test]
#[serial]
fn test_resolve_database_cli_takes_precedence() {
    let original = std::env::var(DATABASE_ENV_VAR).ok();
    std::env::set_var(DATABASE_ENV_VAR, "env.duckdb");
    let config = Config::default();
    let resolved = config.resolve_database(Some("cli.duckdb"));
    assert_eq!(resolved.path, "cli.duckdb");
    match original {
        Some(v) => std::env::set_var(DATABASE_ENV_VAR, v),
        None => std::env::remove_var(DATABASE_ENV_VAR),
    }
}

#[test]
#[serial]
fn test_resolve_database_uses_env_var() {
    let original = std::env::var(DATABASE_ENV_VAR).ok();
    std::env::set_var(DATABASE_ENV_VAR, "env.duckdb");
    let config = Config::default();
    let resolved = config.resolve_database(None);
    assert_eq!(resolved.path, "env.duckdb");
    match original {
        Some(v) => std::env::set_var(DATABASE_ENV_VAR, v),
        None => std::env::remove_var(DATABASE_ENV_VAR),
    }
}

#[test]
#[serial]
fn test_resolve_database_falls_back_to_config() {
    let original = std::env::var(DATABASE_ENV_VAR).ok();
    std::env::remove_var(DATABASE_ENV_VAR);
    let config: Config = serde_yaml::from_str("database:\n  path: cfg.duckdb\n").unwrap();
    let resolved = config.resolve_database(None);
    assert_eq!(resolved.path, "cfg.duckdb");
    if let Some(v) = original {
        std::env::set_var(DATABASE_ENV_VAR, v);
    }
}
