//! Application configuration and external tool resolution.

mod settings;
mod tools;

pub use settings::{LoggingSettings, PathSettings, Settings, SettingsError, SettingsResult};
pub use tools::{ConfigurationError, FfmpegTool};
