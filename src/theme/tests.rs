use std::fs;
use std::path::Path;

use serde_json::Value;
use tempfile::TempDir;

use super::*;
use crate::settings::colors::ColorsOptions;

const THEME_JSON: &str = r##"{
  "version": 2,
  "$schema": "https://schemas.wp.org/trunk/theme.json",
  "settings": {
    "color": {
      "palette": [
        { "slug": "background", "name": "Фон", "color": "#ffffff" },
        { "slug": "custom-extra", "name": "Extra", "color": "#111" },
        { "slug": "links", "name": "Links", "color": "#0000ff" }
      ]
    },
    "layout": { "contentSize": "720px" }
  }
}
"##;

fn setup(content: Option<&str>) -> (TempDir, ConfigManager) {
    let dir = TempDir::new().unwrap();
    let theme = dir.path().join("theme/theme.json");
    if let Some(content) = content {
        fs::create_dir_all(theme.parent().unwrap()).unwrap();
        fs::write(&theme, content).unwrap();
    }
    let manager = ConfigManager::new(&theme, dir.path().join("plugin/config/theme.json")).unwrap();
    (dir, manager)
}

fn read(path: &Path) -> Vec<u8> {
    fs::read(path).unwrap()
}

fn colors() -> ColorsOptions {
    ColorsOptions {
        background_color: "#abcdef".into(),
        ..Default::default()
    }
}

#[test]
fn test_new_creates_backup() {
    let (_dir, manager) = setup(Some(THEME_JSON));
    assert_eq!(read(manager.backup_path()), THEME_JSON.as_bytes());
    assert_eq!(manager.ensure_backup().unwrap(), BackupStatus::Exists);
}

#[test]
fn test_backup_without_source() {
    let (_dir, manager) = setup(None);
    assert!(!manager.backup_path().exists());
    assert_eq!(manager.ensure_backup().unwrap(), BackupStatus::NoSource);
}

#[test]
fn test_backup_written_once() {
    let (_dir, manager) = setup(Some(THEME_JSON));
    let backup = manager.backup_path();
    let modified = fs::metadata(backup).unwrap().modified().unwrap();

    fs::write(manager.theme_config(), "{\"changed\": true}").unwrap();
    std::thread::sleep(std::time::Duration::from_millis(20));
    assert_eq!(manager.ensure_backup().unwrap(), BackupStatus::Exists);

    assert_eq!(fs::metadata(backup).unwrap().modified().unwrap(), modified);
    assert_eq!(read(backup), THEME_JSON.as_bytes());
}

#[test]
fn test_sync_twice_is_byte_identical() {
    let (_dir, manager) = setup(Some(THEME_JSON));

    let first = manager.sync_palette(&colors()).unwrap();
    assert_eq!(first, SyncOutcome::Written { updated: 2, changed: true });
    let after_first = read(manager.theme_config());

    let second = manager.sync_palette(&colors()).unwrap();
    assert_eq!(second, SyncOutcome::Written { updated: 2, changed: false });
    assert_eq!(read(manager.theme_config()), after_first);
}

#[test]
fn test_sync_leaves_unknown_slugs() {
    let (_dir, manager) = setup(Some(THEME_JSON));
    manager.sync_palette(&colors()).unwrap();

    let doc: Value = serde_json::from_slice(&read(manager.theme_config())).unwrap();
    let palette = doc["settings"]["color"]["palette"].as_array().unwrap();
    assert_eq!(palette[0]["color"], "#abcdef");
    assert_eq!(palette[1], serde_json::json!({"slug": "custom-extra", "name": "Extra", "color": "#111"}));
    assert_eq!(palette[2]["color"], "#1e73be");
}

#[test]
fn test_sync_output_format() {
    let (_dir, manager) = setup(Some(THEME_JSON));
    manager.sync_palette(&colors()).unwrap();

    let text = String::from_utf8(read(manager.theme_config())).unwrap();
    assert!(text.starts_with("{\n    \"version\": 2,\n    \"$schema\": \"https://schemas.wp.org/trunk/theme.json\","));
    assert!(text.contains("\"name\": \"Фон\""));
    assert!(text.contains("\"contentSize\": \"720px\""));
    assert!(text.ends_with('}'));
}

#[test]
fn test_sync_skips() {
    let (_dir, manager) = setup(None);
    assert_eq!(
        manager.sync_palette(&colors()).unwrap(),
        SyncOutcome::Skipped(SkipReason::MissingFile)
    );

    let (_dir, manager) = setup(Some("{ not json"));
    assert!(matches!(
        manager.sync_palette(&colors()).unwrap(),
        SyncOutcome::Skipped(SkipReason::Malformed(_))
    ));
    assert_eq!(read(manager.theme_config()), b"{ not json");

    let no_palette = r#"{"settings": {"color": {"palette": []}}}"#;
    let (_dir, manager) = setup(Some(no_palette));
    assert_eq!(
        manager.sync_palette(&colors()).unwrap(),
        SyncOutcome::Skipped(SkipReason::NoPalette)
    );
    assert_eq!(read(manager.theme_config()), no_palette.as_bytes());
}

#[test]
fn test_restore_returns_original_bytes() {
    let (_dir, manager) = setup(Some(THEME_JSON));
    manager.sync_palette(&colors()).unwrap();
    assert_ne!(read(manager.theme_config()), THEME_JSON.as_bytes());

    assert_eq!(manager.restore().unwrap(), RestoreOutcome::Restored);
    assert_eq!(read(manager.theme_config()), THEME_JSON.as_bytes());
}

#[test]
fn test_restore_without_backup() {
    let (_dir, manager) = setup(None);
    assert_eq!(manager.restore().unwrap(), RestoreOutcome::NoBackup);
    assert!(!manager.theme_config().exists());
}

#[test]
fn test_read_palette() {
    let (_dir, manager) = setup(Some(THEME_JSON));
    let palette = manager.read_palette().unwrap().unwrap();
    assert_eq!(palette.len(), 3);
    assert_eq!(palette[2], PaletteEntry::new("Links", "links", "#0000ff"));

    let (_dir, manager) = setup(None);
    assert_eq!(manager.read_palette().unwrap(), None);
}

#[test]
fn test_status() {
    let (_dir, manager) = setup(Some(THEME_JSON));
    let status = manager.status().unwrap();
    assert!(status.theme_exists);
    assert!(status.backup_exists);
    assert_eq!(status.palette_len, Some(3));
}
