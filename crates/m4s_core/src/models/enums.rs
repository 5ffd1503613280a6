//! Core enums used throughout the application.

use serde::{Deserialize, Serialize};

/// On-disk folder layout produced by the source platform's download clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Desktop client layout: `videoInfo.json` sits in the folder root,
    /// fragments next to it.
    DesktopOrigin,
    /// Mobile client layout: a `c_*` subdirectory holds `entry.json` and a
    /// numbered child directory with the fragments.
    MobileOrigin,
    /// Layout could not be recognized.
    #[default]
    Unknown,
}

impl LayoutKind {
    /// Whether this is one of the two recognized layouts.
    pub fn is_known(&self) -> bool {
        !matches!(self, LayoutKind::Unknown)
    }
}

impl std::fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutKind::DesktopOrigin => write!(f, "desktop"),
            LayoutKind::MobileOrigin => write!(f, "mobile"),
            LayoutKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// How a pair of fragments is handed to the external merge tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Merge the raw fragments as-is (no header repair).
    Direct,
    /// Repair both fragment headers into temp files, then merge those.
    RepairFirst,
}

impl std::fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeStrategy::Direct => write!(f, "direct merge"),
            MergeStrategy::RepairFirst => write!(f, "repair then merge"),
        }
    }
}
