use std::collections::HashMap;
use std::fs;

use okc_config::{ConfigError, load_from};

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

#[test]
fn user_file_overrides_defaults() {
    let home = tempfile::tempdir().unwrap();
    fs::write(
        home.path().join("config.toml"),
        "[playback]\nspeed = 4.0\n\n[ui]\nframe_ms = 33\n",
    )
    .unwrap();

    let loaded = load_from(Some(home.path()), None, &HashMap::new()).unwrap();
    assert_eq!(loaded.config.playback.speed, 4.0);
    assert_eq!(loaded.config.playback.tick_ms, 100);
    assert_eq!(loaded.config.ui.frame_ms, 33);
    assert_eq!(loaded.loaded_files, vec![home.path().join("config.toml")]);
}

#[test]
fn explicit_file_wins_over_user_file() {
    let home = tempfile::tempdir().unwrap();
    fs::write(home.path().join("config.toml"), "[playback]\nline_ms = 400\n").unwrap();
    let explicit = home.path().join("demo.toml");
    fs::write(&explicit, "[playback]\nline_ms = 50\n").unwrap();

    let loaded = load_from(Some(home.path()), Some(&explicit), &HashMap::new()).unwrap();
    assert_eq!(loaded.config.playback.line_ms, 50);
    assert_eq!(loaded.loaded_files.len(), 2);
}

#[test]
fn env_fills_only_fields_no_file_set() {
    let home = tempfile::tempdir().unwrap();
    fs::write(home.path().join("config.toml"), "[logging]\nlevel = \"warn\"\n").unwrap();

    let vars = env(&[("OKC_LOG_LEVEL", "trace"), ("OKC_TICK_MS", "50")]);
    let loaded = load_from(Some(home.path()), None, &vars).unwrap();
    assert_eq!(loaded.config.logging.level, "warn");
    assert_eq!(loaded.config.playback.tick_ms, 50);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_from(None, Some(&dir.path().join("nope.toml")), &HashMap::new()).unwrap_err();
    assert!(matches!(err, ConfigError::ReadError { .. }));
}

#[test]
fn malformed_file_reports_path() {
    let home = tempfile::tempdir().unwrap();
    fs::write(home.path().join("config.toml"), "[playback\ntick_ms = ").unwrap();
    let err = load_from(Some(home.path()), None, &HashMap::new()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { ref path, .. } if path.ends_with("config.toml")));
}

#[test]
fn wrong_type_fails_deserialization() {
    let home = tempfile::tempdir().unwrap();
    fs::write(home.path().join("config.toml"), "[playback]\ntick_ms = \"fast\"\n").unwrap();
    let err = load_from(Some(home.path()), None, &HashMap::new()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { ref path, .. } if path == "<merged config>"));
}

#[test]
fn invalid_values_fail_validation() {
    let home = tempfile::tempdir().unwrap();
    fs::write(home.path().join("config.toml"), "[playback]\nspeed = -1.0\n").unwrap();
    let err = load_from(Some(home.path()), None, &HashMap::new()).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "playback.speed"));
}

#[test]
fn oversized_file_rejected() {
    let home = tempfile::tempdir().unwrap();
    let padding = "# padding\n".repeat(110_000);
    fs::write(home.path().join("config.toml"), padding).unwrap();
    let err = load_from(Some(home.path()), None, &HashMap::new()).unwrap_err();
    assert!(err.to_string().contains("byte limit"));
}
