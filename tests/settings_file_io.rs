//! Integration tests for settings file I/O.
//!
//! These tests verify atomic writes, defaults on missing or corrupt files,
//! and the read-modify-write field helpers.

use fetchbar::settings::{Settings, SettingsStore};
use std::fs;
use tempfile::tempdir;

fn store_in(dir: &tempfile::TempDir) -> SettingsStore {
    SettingsStore::new(dir.path().join(".fetchbar").join("settings.toml"))
}

#[test]
fn test_save_and_load_roundtrip() {
    let temp_dir = tempdir().unwrap();
    let store = store_in(&temp_dir);

    let settings = Settings {
        fetch_url: Some("https://example.com/weather".to_string()),
        refresh_interval: Some(30),
        launch_at_login: true,
    };
    store.save(&settings).unwrap();

    assert_eq!(store.load(), settings);
}

#[test]
fn test_load_missing_file_returns_defaults() {
    let temp_dir = tempdir().unwrap();
    let store = store_in(&temp_dir);

    assert_eq!(store.load(), Settings::default());
}

#[test]
fn test_load_invalid_toml_returns_defaults() {
    let temp_dir = tempdir().unwrap();
    let store = store_in(&temp_dir);

    fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    fs::write(store.path(), "not { valid [ toml").unwrap();

    assert_eq!(store.load(), Settings::default());
}

#[test]
fn test_atomic_write_leaves_no_temp_file() {
    let temp_dir = tempdir().unwrap();
    let store = store_in(&temp_dir);

    store.save(&Settings::default()).unwrap();

    let temp_path = store.path().with_extension("toml.tmp");
    assert!(
        !temp_path.exists(),
        "Temp file should not remain after write"
    );
    assert!(store.path().exists(), "Settings file should exist");

    // File should be valid TOML
    let content = fs::read_to_string(store.path()).unwrap();
    Settings::from_toml(&content).unwrap();
}

#[test]
fn test_set_url_preserves_other_fields() {
    let temp_dir = tempdir().unwrap();
    let store = store_in(&temp_dir);

    store
        .save(&Settings {
            fetch_url: None,
            refresh_interval: Some(15),
            launch_at_login: true,
        })
        .unwrap();

    store.set_url("https://example.com/status").unwrap();

    let settings = store.load();
    assert_eq!(
        settings.fetch_url.as_deref(),
        Some("https://example.com/status")
    );
    assert_eq!(settings.refresh_interval, Some(15));
    assert!(settings.launch_at_login);
}

#[test]
fn test_set_url_stores_string_verbatim() {
    let temp_dir = tempdir().unwrap();
    let store = store_in(&temp_dir);

    // No validation at save time; even a non-URL string is persisted as-is.
    store.set_url("not really a url").unwrap();
    assert_eq!(store.load().fetch_url.as_deref(), Some("not really a url"));
}

#[test]
fn test_set_refresh_interval_preserves_other_fields() {
    let temp_dir = tempdir().unwrap();
    let store = store_in(&temp_dir);

    store.set_url("https://example.com/a").unwrap();
    store.set_refresh_interval(120).unwrap();

    let settings = store.load();
    assert_eq!(settings.fetch_url.as_deref(), Some("https://example.com/a"));
    assert_eq!(settings.refresh_interval, Some(120));
}

#[test]
fn test_non_positive_interval_persists_but_defaults_to_sixty() {
    let temp_dir = tempdir().unwrap();
    let store = store_in(&temp_dir);

    store.set_refresh_interval(-5).unwrap();

    let settings = store.load();
    assert_eq!(settings.refresh_interval, Some(-5));
    assert_eq!(settings.effective_interval(), 60);
}

#[test]
fn test_set_launch_at_login_toggles() {
    let temp_dir = tempdir().unwrap();
    let store = store_in(&temp_dir);

    store.set_launch_at_login(true).unwrap();
    assert!(store.load().launch_at_login);

    store.set_launch_at_login(false).unwrap();
    assert!(!store.load().launch_at_login);
}
