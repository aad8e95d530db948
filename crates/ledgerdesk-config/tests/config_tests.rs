use std::fs;

use ledgerdesk_config::{Config, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_points_at_local_api() {
    let cfg = Config::default();

    assert!(cfg.api_base_url.starts_with("http://"));
    assert_eq!(cfg.request_timeout_secs, 30);
    assert!(cfg.default_company_id.is_none());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut cfg = Config::default();
    cfg.set("api_base_url", "https://erp.example.com/").expect("url");
    cfg.set("default_company_id", "3").expect("company");

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"), dir.path().join("backups"));
    assert_eq!(manager.load().expect("load"), Config::default());
}

#[test]
fn partial_file_fills_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"currency":"EUR","locale":"de-DE"}"#).expect("write");
    let manager = ConfigManager::new(path, dir.path().join("backups"));

    let loaded = manager.load().expect("load");
    assert_eq!(loaded.currency, "EUR");
    assert_eq!(loaded.request_timeout_secs, 30);
    assert!(loaded.ui_color_enabled);
}

#[test]
fn backup_and_restore_round_trip() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut original = Config::default();
    original.set("currency", "GBP").expect("currency");
    let name = manager.backup(&original, Some("Before go-live")).expect("backup");
    assert!(name.ends_with("_before-go-live.json"));

    let mut changed = original.clone();
    changed.set("currency", "JPY").expect("currency");
    manager.save(&changed).expect("save");

    let restored = manager.restore(&name).expect("restore");
    assert_eq!(restored.currency, "GBP");
    assert_eq!(manager.load().expect("load").currency, "GBP");
    assert_eq!(manager.list_backups().expect("list"), vec![name]);
}

#[test]
fn restoring_unknown_backup_fails() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    assert!(manager.restore("config_20990101_000000.json").is_err());
}
