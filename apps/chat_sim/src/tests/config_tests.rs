use super::*;

use std::{collections::HashMap, io::Write};

fn no_env(_: &str) -> Option<String> {
    None
}

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = load_settings_with_env(None, no_env).expect("settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.initial_rate.get(), 10);
    assert_eq!(settings.operator_label, "You");
    assert_eq!(settings.output, OutputFormat::Terminal);
}

#[test]
fn file_values_override_defaults() {
    let file = write_config(
        r##"
initial_rate = 25
seed = 99
operator_label = "Host"
operator_color = "#00aaff"
output = "json"
autostart = true
"##,
    );

    let settings = load_settings_with_env(Some(file.path()), no_env).expect("settings");
    assert_eq!(settings.initial_rate.get(), 25);
    assert_eq!(settings.seed, Some(99));
    assert_eq!(settings.operator_label, "Host");
    assert_eq!(settings.operator_color, ColorHint::new("#00aaff"));
    assert_eq!(settings.output, OutputFormat::Json);
    assert!(settings.autostart);
    assert_eq!(settings.log_filter, "warn");
}

#[test]
fn file_rate_is_clamped() {
    let file = write_config("initial_rate = 900\n");
    let settings = load_settings_with_env(Some(file.path()), no_env).expect("settings");
    assert_eq!(settings.initial_rate.get(), RateSetting::MAX);
}

#[test]
fn env_overrides_file() {
    let file = write_config("initial_rate = 25\noutput = \"json\"\n");
    let env = HashMap::from([
        ("CHAT_SIM__INITIAL_RATE", "40"),
        ("CHAT_SIM__OUTPUT", "Terminal"),
        ("CHAT_SIM__LOG_FILTER", "sim_core=debug"),
    ]);

    let settings = load_settings_with_env(Some(file.path()), |key| {
        env.get(key).map(|v| v.to_string())
    })
    .expect("settings");
    assert_eq!(settings.initial_rate.get(), 40);
    assert_eq!(settings.output, OutputFormat::Terminal);
    assert_eq!(settings.log_filter, "sim_core=debug");
}

#[test]
fn unparseable_env_values_are_skipped() {
    let env = HashMap::from([
        ("CHAT_SIM__INITIAL_RATE", "fast"),
        ("CHAT_SIM__SEED", "-1"),
        ("CHAT_SIM__AUTOSTART", "maybe"),
    ]);

    let settings =
        load_settings_with_env(None, |key| env.get(key).map(|v| v.to_string())).expect("settings");
    assert_eq!(settings.initial_rate.get(), 10);
    assert_eq!(settings.seed, None);
    assert!(!settings.autostart);
}

#[test]
fn missing_explicit_config_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.toml");

    let error = load_settings_with_env(Some(&path), no_env).expect_err("missing file");
    assert!(error.to_string().contains("failed to read config file"));
}

#[test]
fn malformed_or_unknown_keys_are_rejected() {
    let broken = write_config("initial_rate = \n");
    let error = load_settings_with_env(Some(broken.path()), no_env).expect_err("bad toml");
    assert!(error.to_string().contains("failed to parse config file"));

    let unknown = write_config("message_rate = 10\n");
    assert!(load_settings_with_env(Some(unknown.path()), no_env).is_err());
}
