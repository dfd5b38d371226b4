use gcodegen_core::{ClosedCurveDistance, FlattenOptions};
use gcodegen_settings::{ConfigError, RunConfig, SettingsError};
use std::path::PathBuf;
use tempfile::tempdir;

fn sample_config() -> RunConfig {
    RunConfig {
        input: Some(PathBuf::from("drawing.svg")),
        output: None,
        feedrate: 150.5,
        scale: 0.5,
        offset_x: 10.0,
        offset_y: -2.0,
        flatten: FlattenOptions {
            num_segments: 64,
            closed_distance: ClosedCurveDistance::Chord,
            ..Default::default()
        },
    }
}

#[test]
fn test_toml_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.toml");

    let config = sample_config();
    config.save_to_file(&path).unwrap();
    assert_eq!(RunConfig::load_from_file(&path).unwrap(), config);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("feedrate = 150.5"));
    assert!(text.contains("[flatten]"));
    assert!(!text.contains("output"));
}

#[test]
fn test_json_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.json");

    let config = sample_config();
    config.save_to_file(&path).unwrap();
    assert_eq!(RunConfig::load_from_file(&path).unwrap(), config);
}

#[test]
fn test_load_rejects_invalid_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "scale = 0.0\n").unwrap();

    let err = RunConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::ValueOutOfRange { .. })
    ));
}

#[test]
fn test_load_reports_syntax_errors() {
    let dir = tempdir().unwrap();
    let toml_path = dir.path().join("broken.toml");
    std::fs::write(&toml_path, "feedrate = = 3").unwrap();
    assert!(matches!(
        RunConfig::load_from_file(&toml_path),
        Err(SettingsError::TomlError(_))
    ));

    let json_path = dir.path().join("broken.json");
    std::fs::write(&json_path, "{ \"feedrate\": }").unwrap();
    assert!(matches!(
        RunConfig::load_from_file(&json_path),
        Err(SettingsError::JsonError(_))
    ));
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let err = RunConfig::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, SettingsError::LoadError(_)));
}

#[test]
fn test_save_refuses_invalid_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.toml");
    let config = RunConfig {
        feedrate: -1.0,
        ..Default::default()
    };
    assert!(config.save_to_file(&path).is_err());
    assert!(!path.exists());
}
