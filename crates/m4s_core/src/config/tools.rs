//! External tool resolution.
//!
//! The merge tool's location is resolved exactly once at startup into an
//! immutable [`FfmpegTool`] value that callers pass by reference; there
//! is no global mutable tool path. Resolution failure is a typed
//! configuration error that short-circuits all processing.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;

/// Name of the external merge tool on PATH.
const FFMPEG_COMMAND: &str = "ffmpeg";

/// Fatal configuration problem, raised before any folder is touched.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("configured ffmpeg path does not exist: {0}")]
    ExplicitPathMissing(PathBuf),

    #[error("ffmpeg not found on PATH; install it or set an explicit path")]
    NotOnPath,
}

/// Resolved, immutable location of the external merge tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfmpegTool {
    path: PathBuf,
}

impl FfmpegTool {
    /// Resolve the tool once.
    ///
    /// An explicit path, when configured, must exist and wins over PATH
    /// lookup. Otherwise `ffmpeg -version` is probed on PATH, mirroring
    /// how the tool will later be launched.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigurationError> {
        if let Some(path) = explicit {
            if path.is_file() {
                tracing::debug!("using configured ffmpeg at {}", path.display());
                return Ok(Self {
                    path: path.to_path_buf(),
                });
            }
            return Err(ConfigurationError::ExplicitPathMissing(path.to_path_buf()));
        }

        let probe = Command::new(FFMPEG_COMMAND)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match probe {
            Ok(status) if status.success() => {
                tracing::debug!("found ffmpeg on PATH");
                Ok(Self {
                    path: PathBuf::from(FFMPEG_COMMAND),
                })
            }
            _ => Err(ConfigurationError::NotOnPath),
        }
    }

    /// Build a tool handle from a known-good location (tests, embedders).
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path or command name to launch.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display string for logs.
    pub fn display(&self) -> String {
        self.path.display().to_string()
    }
}
