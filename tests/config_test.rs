//! Integration tests for layered Settings loading

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use tbird::application::ApplicationError;
use tbird::config::Settings;

#[test]
fn given_missing_config_file_when_load_then_uses_defaults() {
    let temp = TempDir::new().unwrap();

    let settings = Settings::load_from(Some(&temp.path().join("absent.toml"))).unwrap();

    assert!(settings.store_path.ends_with("store.json"));
}

#[test]
fn given_config_file_when_load_then_overrides_defaults() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("tbird.toml");
    fs::write(
        &config,
        r#"
store_path = "/srv/tb/store.json"
sync_permissions = false
"#,
    )
    .unwrap();

    let settings = Settings::load_from(Some(&config)).unwrap();

    assert_eq!(settings.store_path, PathBuf::from("/srv/tb/store.json"));
    assert!(!settings.sync_permissions);
}

#[test]
fn given_invalid_toml_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("tbird.toml");
    fs::write(&config, "store_path = [").unwrap();

    let result = Settings::load_from(Some(&config));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}
