//! Media-related data structures (fragments, detected layouts, track pairs).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::enums::LayoutKind;

/// File extension used by media fragments (matched case-insensitively).
pub const FRAGMENT_EXTENSION: &str = "m4s";

/// Check whether a path carries the fragment extension (`.m4s`, any case).
pub fn is_fragment_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(FRAGMENT_EXTENSION))
}

/// A single fragment file discovered on disk.
///
/// Immutable once enumerated; the byte size recorded here is what the
/// track disambiguation heuristic sorts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentFile {
    /// Absolute path to the fragment.
    pub path: PathBuf,
    /// Byte size at enumeration time.
    pub size: u64,
    /// Layout the fragment was discovered under.
    pub origin: LayoutKind,
}

impl FragmentFile {
    pub fn new(path: impl Into<PathBuf>, size: u64, origin: LayoutKind) -> Self {
        Self {
            path: path.into(),
            size,
            origin,
        }
    }

    /// File name for log messages.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Result of classifying an input folder.
///
/// For a known kind both paths are present and point at existing entries;
/// for `Unknown` both are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedLayout {
    /// Recognized layout kind.
    pub kind: LayoutKind,
    /// Directory holding the `.m4s` fragments.
    pub fragment_dir: Option<PathBuf>,
    /// Path to the metadata descriptor (`videoInfo.json` / `entry.json`).
    pub metadata_path: Option<PathBuf>,
}

impl DetectedLayout {
    /// Layout that could not be recognized.
    pub fn unknown() -> Self {
        Self {
            kind: LayoutKind::Unknown,
            fragment_dir: None,
            metadata_path: None,
        }
    }

    /// Desktop layout: fragments live next to `videoInfo.json`.
    pub fn desktop(fragment_dir: impl Into<PathBuf>, metadata_path: impl Into<PathBuf>) -> Self {
        Self {
            kind: LayoutKind::DesktopOrigin,
            fragment_dir: Some(fragment_dir.into()),
            metadata_path: Some(metadata_path.into()),
        }
    }

    /// Mobile layout: fragments live in a numbered child of the `c_*` directory.
    pub fn mobile(fragment_dir: impl Into<PathBuf>, metadata_path: impl Into<PathBuf>) -> Self {
        Self {
            kind: LayoutKind::MobileOrigin,
            fragment_dir: Some(fragment_dir.into()),
            metadata_path: Some(metadata_path.into()),
        }
    }

    /// Whether detection succeeded.
    pub fn is_known(&self) -> bool {
        self.kind.is_known()
    }
}

/// The video/audio pair selected from a fragment directory.
///
/// Invariant: `primary.size >= secondary.size`. The larger fragment is
/// assumed to be the video track; this is a size heuristic, not a
/// format-verified classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackPair {
    /// Presumed video track (largest fragment).
    pub primary: FragmentFile,
    /// Presumed audio track (second largest fragment).
    pub secondary: FragmentFile,
}

impl TrackPair {
    pub fn new(primary: FragmentFile, secondary: FragmentFile) -> Self {
        debug_assert!(primary.size >= secondary.size);
        Self { primary, secondary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_extension_is_case_insensitive() {
        assert!(is_fragment_file(Path::new("video.m4s")));
        assert!(is_fragment_file(Path::new("video.M4S")));
        assert!(is_fragment_file(Path::new("video.M4s")));
        assert!(!is_fragment_file(Path::new("video.mp4")));
        assert!(!is_fragment_file(Path::new("m4s")));
    }

    #[test]
    fn unknown_layout_has_no_paths() {
        let layout = DetectedLayout::unknown();
        assert!(!layout.is_known());
        assert!(layout.fragment_dir.is_none());
        assert!(layout.metadata_path.is_none());
    }

    #[test]
    fn track_pair_orders_by_size() {
        let big = FragmentFile::new("/a/video.m4s", 1000, LayoutKind::MobileOrigin);
        let small = FragmentFile::new("/a/audio.m4s", 100, LayoutKind::MobileOrigin);
        let pair = TrackPair::new(big.clone(), small.clone());
        assert!(pair.primary.size >= pair.secondary.size);
        assert_eq!(pair.primary, big);
    }
}
