//! Settings file and environment layering into option lists.

use std::collections::HashMap;
use std::fs;
use std::time::Duration;

use pg_datastore_config::options;
use pg_datastore_config::{generate_config, Base2Bytes, DatastoreSettings, SettingsError};
use tempfile::tempdir;

#[test]
fn test_file_settings_build_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("datastore.toml");
    fs::write(
        &path,
        r#"
            max_open_conns = 20
            min_open_conns = 2
            health_check_period = "30s"
            revision_fuzzing_timedelta = "5s"
            split_at_estimated_query_size = 1048576
            enable_tracing = true
        "#,
    )
    .unwrap();

    let settings = DatastoreSettings::from_file(&path).unwrap();
    let config = generate_config(settings.to_options()).unwrap();

    assert_eq!(config.max_open_conns(), Some(20));
    assert_eq!(config.min_open_conns(), Some(2));
    assert_eq!(config.health_check_period(), Some(Duration::from_secs(30)));
    assert_eq!(config.revision_fuzzing_timedelta(), Duration::from_secs(5));
    assert_eq!(config.split_at_estimated_query_size(), Base2Bytes::mib(1));
    assert!(config.tracing_enabled());
    assert_eq!(config.watch_buffer_length(), 128);
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let err = DatastoreSettings::from_file(&path).unwrap_err();

    assert!(matches!(err, SettingsError::Io { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_invalid_file_window_surfaces_at_build() {
    let settings =
        DatastoreSettings::from_toml("gc_window = \"2s\"\nrevision_fuzzing_timedelta = \"5s\"")
            .unwrap();
    let err = generate_config(settings.to_options()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "revision fuzzing timedelta (5s) must be less than GC window (2s)"
    );
}

#[test]
fn test_file_then_env_then_explicit_options() {
    let mut settings =
        DatastoreSettings::from_toml("max_open_conns = 10\nconn_max_lifetime = \"1h\"").unwrap();

    let env: HashMap<&str, &str> = [
        ("PG_DATASTORE_MAX_OPEN_CONNS", "15"),
        ("PG_DATASTORE_WATCH_BUFFER_LENGTH", "512"),
    ]
    .into_iter()
    .collect();
    settings
        .apply_overrides_from(|key| env.get(key).map(|v| v.to_string()))
        .unwrap();

    let mut opts = settings.to_options();
    opts.push(options::watch_buffer_length(1024));
    let config = generate_config(opts).unwrap();

    assert_eq!(config.max_open_conns(), Some(15));
    assert_eq!(config.conn_max_lifetime(), Some(Duration::from_secs(3600)));
    assert_eq!(config.watch_buffer_length(), 1024);
}
