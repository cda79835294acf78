use rosetta_core::{IndexMode, LinearAxis};
use rosetta_settings::{Config, ConfigError, HelpResource, SettingsError};
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_defaults_match_panel_start_up_values() {
    let config = Config::default();
    config.validate().unwrap();

    assert_eq!(config.defaults.b.feed_rate, 10.0);
    assert_eq!(config.defaults.b.index_distance, 90.0);
    assert_eq!(config.defaults.b.index_mode, IndexMode::Degrees);
    assert_eq!(config.defaults.spindle.speed, 1.0);
    assert_eq!(config.defaults.spindle.secondary_percent, 100.0);
    for axis in LinearAxis::ALL {
        assert_eq!(config.defaults.linear(axis).feed_rate, 1.0);
        assert_eq!(config.defaults.linear(axis).index_distance, 0.0);
    }
    assert_eq!(config.index.precision(), Some(1));
    assert_eq!(config.dispatch.mode_timeout(), Duration::from_secs(5));
}

#[test]
fn test_toml_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("panel").join("config.toml");

    let mut config = Config::default();
    config.defaults.linear_mut(LinearAxis::X).index_distance = 2.5;
    config.defaults.b.index_mode = IndexMode::Divisions;
    config.defaults.b.index_distance = 24.0;
    config.index.round_degrees = false;
    config.save_to_file(&path).unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.index.precision(), None);
}

#[test]
fn test_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let mut config = Config::default();
    config.dispatch.command_timeout_ms = 30_000;
    config.save_to_file(&path).unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded.dispatch.command_timeout(), Duration::from_secs(30));
}

#[test]
fn test_partial_file_fills_in_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[defaults.spindle]\nspeed = 250.0\n\n[links]\nuser_manual = \"file:///manual.pdf\"\n",
    )
    .unwrap();

    let config = Config::load_from_file(&path).unwrap();
    assert_eq!(config.defaults.spindle.speed, 250.0);
    assert_eq!(config.defaults.spindle.secondary_percent, 100.0);
    assert_eq!(config.links.url(HelpResource::UserManual), "file:///manual.pdf");
    assert_eq!(
        config.links.url(HelpResource::GcodeLibrary),
        "https://gcode.RoseEngineButler.com"
    );
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_zero_divisions_default_is_rejected() {
    let mut config = Config::default();
    config.defaults.spindle.index_mode = IndexMode::Divisions;
    config.defaults.spindle.secondary_index_distance = 0.0;

    assert_eq!(
        config.validate(),
        Err(ConfigError::ValueOutOfRange {
            key: "defaults.spindle.secondary_index_distance".to_string(),
            value: "0".to_string(),
        })
    );
}

#[test]
fn test_zero_timeout_is_rejected() {
    let mut config = Config::default();
    config.dispatch.mode_timeout_ms = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_unknown_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let err = Config::default()
        .save_to_file(&dir.path().join("config.yaml"))
        .unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::UnsupportedFormat(ref ext)) if ext == "yaml"
    ));
}

#[test]
fn test_divisions_rounding_to_zero_are_rejected() {
    let mut config = Config::default();
    config.defaults.b.index_mode = IndexMode::Divisions;
    config.defaults.b.index_distance = 7201.0;
    assert!(config.validate().is_err());

    config.index.round_degrees = false;
    config.validate().unwrap();
}
