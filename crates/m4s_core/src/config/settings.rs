//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Every field carries a serde default so partial files load cleanly.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::{LogConfig, LogLevel};

/// Errors that can occur during settings load/save.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    ReadError(#[from] io::Error),

    #[error("failed to parse settings: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("failed to serialize settings: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load settings from a TOML file, using defaults if it is absent.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save settings atomically (write to temp file, then rename).
    pub fn save(&self, path: &Path) -> SettingsResult<()> {
        let content = toml::to_string_pretty(self)?;
        let tmp_path = path.with_extension("toml.tmp");
        {
            let mut tmp = fs::File::create(&tmp_path)?;
            tmp.write_all(content.as_bytes())?;
            tmp.sync_all()?;
        }
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Logger configuration derived from the logging section.
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.logging.level,
            error_tail: self.logging.error_tail as usize,
            show_timestamps: self.logging.show_timestamps,
        }
    }
}

/// Path configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Output folder for merged files.
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    /// Explicit ffmpeg path; empty means resolve from PATH.
    #[serde(default)]
    pub ffmpeg_path: String,
}

impl PathSettings {
    /// Explicit ffmpeg path, if one is configured.
    pub fn ffmpeg_path(&self) -> Option<PathBuf> {
        if self.ffmpeg_path.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.ffmpeg_path))
        }
    }
}

fn default_output_folder() -> String {
    "remux_output".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            output_folder: default_output_folder(),
            ffmpeg_path: String::new(),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Minimum level for per-folder events.
    #[serde(default)]
    pub level: LogLevel,

    /// Number of external-tool output lines retained for error diagnosis.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Show timestamps in event messages.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

fn default_error_tail() -> u32 {
    20
}

fn default_true() -> bool {
    true
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            error_tail: default_error_tail(),
            show_timestamps: default_true(),
        }
    }
}
