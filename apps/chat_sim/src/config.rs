use std::{fs, io, path::Path};

use anyhow::Context;
use clap::ValueEnum;
use serde::Deserialize;
use shared::domain::{ColorHint, RateSetting};

pub const DEFAULT_CONFIG_FILE: &str = "chat_sim.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub initial_rate: RateSetting,
    pub seed: Option<u64>,
    pub operator_label: String,
    pub operator_color: ColorHint,
    pub output: OutputFormat,
    pub autostart: bool,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_rate: RateSetting::default(),
            seed: None,
            operator_label: "You".into(),
            operator_color: ColorHint::new("#ff4500"),
            output: OutputFormat::Terminal,
            autostart: false,
            log_filter: "warn".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    initial_rate: Option<i64>,
    seed: Option<u64>,
    operator_label: Option<String>,
    operator_color: Option<String>,
    output: Option<OutputFormat>,
    autostart: Option<bool>,
    log_filter: Option<String>,
}

/// Defaults, then the TOML file, then `CHAT_SIM__*` environment variables.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    load_settings_with_env(config_path, |key| std::env::var(key).ok())
}

pub(crate) fn load_settings_with_env(
    config_path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let file_cfg = match config_path {
        Some(path) => Some(read_file_settings(path)?),
        None => match read_file_settings(Path::new(DEFAULT_CONFIG_FILE)) {
            Ok(file_cfg) => Some(file_cfg),
            Err(error) if is_not_found(&error) => None,
            Err(error) => return Err(error),
        },
    };
    if let Some(file_cfg) = file_cfg {
        apply_file_settings(&mut settings, file_cfg);
    }

    if let Some(v) = env("CHAT_SIM__INITIAL_RATE") {
        if let Ok(parsed) = v.trim().parse::<i64>() {
            settings.initial_rate = RateSetting::clamped(parsed);
        }
    }
    if let Some(v) = env("CHAT_SIM__SEED") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.seed = Some(parsed);
        }
    }
    if let Some(v) = env("CHAT_SIM__OPERATOR_LABEL") {
        settings.operator_label = v;
    }
    if let Some(v) = env("CHAT_SIM__OPERATOR_COLOR") {
        settings.operator_color = ColorHint::new(v);
    }
    if let Some(v) = env("CHAT_SIM__OUTPUT") {
        if let Ok(parsed) = OutputFormat::from_str(v.trim(), true) {
            settings.output = parsed;
        }
    }
    if let Some(v) = env("CHAT_SIM__AUTOSTART") {
        if let Ok(parsed) = v.trim().parse::<bool>() {
            settings.autostart = parsed;
        }
    }
    if let Some(v) = env("CHAT_SIM__LOG_FILTER") {
        settings.log_filter = v;
    }

    Ok(settings)
}

fn read_file_settings(path: &Path) -> anyhow::Result<FileSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))
}

fn is_not_found(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<io::Error>()
        .is_some_and(|io_error| io_error.kind() == io::ErrorKind::NotFound)
}

fn apply_file_settings(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.initial_rate {
        settings.initial_rate = RateSetting::clamped(v);
    }
    if let Some(v) = file_cfg.seed {
        settings.seed = Some(v);
    }
    if let Some(v) = file_cfg.operator_label {
        settings.operator_label = v;
    }
    if let Some(v) = file_cfg.operator_color {
        settings.operator_color = ColorHint::new(v);
    }
    if let Some(v) = file_cfg.output {
        settings.output = v;
    }
    if let Some(v) = file_cfg.autostart {
        settings.autostart = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
