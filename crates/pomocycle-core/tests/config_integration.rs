//! Integration tests for config file loading and saving.

use pomocycle_core::{Config, ConfigError, IntervalEngine, Phase};
use tempfile::TempDir;

#[test]
fn missing_file_is_created_with_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let cfg = Config::load_from(&path).unwrap();
    assert_eq!(cfg, Config::default());
    assert!(path.exists());

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("work_minutes = 25"));
    assert!(written.contains("rest_minutes = 5"));
    assert!(written.contains("cycles = 4"));
}

#[test]
fn save_then_load_preserves_edits() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let mut cfg = Config::default();
    cfg.set("timer.work_minutes", "50").unwrap();
    cfg.set("timer.cycles", "2").unwrap();
    cfg.set("notifications.overlay", "false").unwrap();
    cfg.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.timer.work_minutes, 50);
    assert_eq!(loaded.timer.cycles, 2);
    assert!(!loaded.notifications.overlay);
}

#[test]
fn invalid_stored_values_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[timer]\nwork_minutes = 0\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "timer.work_minutes"));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is = = not toml").unwrap();

    assert!(matches!(
        Config::load_from(&path),
        Err(ConfigError::ParseFailed(_))
    ));
}

#[test]
fn loaded_config_drives_a_reconfigure() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[timer]\nwork_minutes = 1\nrest_minutes = 1\ncycles = 3\n").unwrap();

    let cfg = Config::load_from(&path).unwrap();
    let mut engine = IntervalEngine::new(Default::default()).unwrap();
    engine.start();
    let snap = engine.reconfigure(cfg.configuration().unwrap()).unwrap();
    assert_eq!(snap.phase, Phase::Stopped);
    assert_eq!(snap.total_cycles, 3);
    assert_eq!(engine.config().work_secs, 60);
}
