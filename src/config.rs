use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Root of the settings file. Only the `[logging]` table is recognized;
/// unknown keys are ignored so the file can carry notes for other tools.
#[derive(Deserialize, Debug, Default)]
pub struct Settings {
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LoggingSettings {
    /// Minimum level printed to the console.
    pub console_logging_level: String,
    /// Minimum level written to the log file.
    pub file_logging_level: String,
    /// chrono strftime string for the timestamp of each log line.
    pub log_message_format: String,
    /// Folder (relative to the working directory) holding per-script logs.
    pub logs_folder_name: String,
    /// Total byte budget for the log folder; absent disables retention.
    pub max_folder_size: Option<u64>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            console_logging_level: "info".to_string(),
            file_logging_level: "info".to_string(),
            log_message_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            logs_folder_name: "logs".to_string(),
            max_folder_size: None,
        }
    }
}

/// Stem of the running executable; names the settings file and the log folder.
pub fn binary_stem() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

/// The settings file lives next to the program as invoked: `<stem>_config.toml`.
pub fn settings_path(script_name: &str) -> PathBuf {
    PathBuf::from(format!("{script_name}_config.toml"))
}

/// Load the settings file. A missing or malformed file is fatal; the caller
/// reports it before logging is configured.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Settings file not found: \"{}\"", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse settings file \"{}\"", path.display()))
}
