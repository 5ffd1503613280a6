//! Folder structure detection.
//!
//! Classifies an input folder as one of the two known download layouts
//! and locates its metadata descriptor and fragment directory. Detection
//! is deliberately forgiving: any filesystem error during enumeration
//! yields `Unknown` rather than propagating.

use std::fs;
use std::path::Path;

use crate::models::{is_fragment_file, DetectedLayout};

/// Metadata descriptor of the desktop layout, in the folder root.
pub const DESKTOP_METADATA: &str = "videoInfo.json";

/// Metadata descriptor of the mobile layout, inside the `c_*` directory.
pub const MOBILE_METADATA: &str = "entry.json";

/// Prefix of the mobile layout's container directory.
pub const MOBILE_DIR_PREFIX: &str = "c_";

/// Minimum fragment count for a directory to qualify as the fragment dir
/// (one video plus one audio fragment).
const MIN_FRAGMENTS: usize = 2;

/// Classify `folder` into a [`DetectedLayout`].
///
/// Desktop: `videoInfo.json` directly in the folder, fragments next to it.
/// Mobile: the first `c_*` subdirectory must hold `entry.json`; the first
/// of its child directories containing at least two `.m4s` files is the
/// fragment directory. Anything else is `Unknown`.
pub fn detect(folder: &Path) -> DetectedLayout {
    let desktop_metadata = folder.join(DESKTOP_METADATA);
    if desktop_metadata.is_file() {
        return DetectedLayout::desktop(folder, desktop_metadata);
    }

    let Some(container) = first_prefixed_subdir(folder) else {
        return DetectedLayout::unknown();
    };

    let mobile_metadata = container.join(MOBILE_METADATA);
    if !mobile_metadata.is_file() {
        return DetectedLayout::unknown();
    }

    match first_fragment_subdir(&container) {
        Some(fragment_dir) => DetectedLayout::mobile(fragment_dir, mobile_metadata),
        None => DetectedLayout::unknown(),
    }
}

/// First immediate subdirectory whose name starts with [`MOBILE_DIR_PREFIX`].
///
/// Entries are sorted by name so detection is deterministic regardless of
/// filesystem enumeration order.
fn first_prefixed_subdir(folder: &Path) -> Option<std::path::PathBuf> {
    sorted_subdirs(folder)?
        .into_iter()
        .find(|dir| {
            dir.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(MOBILE_DIR_PREFIX))
        })
}

/// First immediate subdirectory containing at least [`MIN_FRAGMENTS`]
/// fragment files. Unreadable subdirectories are skipped.
fn first_fragment_subdir(container: &Path) -> Option<std::path::PathBuf> {
    sorted_subdirs(container)?
        .into_iter()
        .find(|dir| count_fragments(dir) >= MIN_FRAGMENTS)
}

/// Immediate subdirectories of `folder`, sorted by name.
///
/// Returns `None` when the folder cannot be enumerated.
fn sorted_subdirs(folder: &Path) -> Option<Vec<std::path::PathBuf>> {
    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("failed to enumerate {}: {}", folder.display(), e);
            return None;
        }
    };

    let mut dirs: Vec<_> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    Some(dirs)
}

/// Count `.m4s` files directly inside `dir`; 0 if unreadable.
fn count_fragments(dir: &Path) -> usize {
    match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_fragment_file(path))
            .count(),
        Err(e) => {
            tracing::debug!("failed to scan {}: {}", dir.display(), e);
            0
        }
    }
}
