//! Title extraction from metadata descriptors.
//!
//! Each layout ships a JSON descriptor whose schema differs by client;
//! the only field this tool contractually reads is the human-readable
//! title. It is located by probing an ordered list of known key paths
//! until one yields a non-empty string.

use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::models::LayoutKind;

/// Key paths probed for the desktop descriptor (`videoInfo.json`).
const DESKTOP_TITLE_PATHS: &[&str] = &["title", "videoData.title", "page_data.part", "videoName"];

/// Key paths probed for the mobile descriptor (`entry.json`).
const MOBILE_TITLE_PATHS: &[&str] = &["title", "page_data.part"];

/// Failure to read or parse a metadata descriptor.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("failed to read descriptor: {0}")]
    Read(#[from] io::Error),

    #[error("failed to parse descriptor: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Extract a title from the descriptor at `metadata_path`.
///
/// Returns `Ok(None)` when the descriptor parses but none of the probed
/// key paths yields a non-empty string; the caller falls back to the
/// folder name in that case.
pub fn extract_title(metadata_path: &Path, kind: LayoutKind) -> MetadataResult<Option<String>> {
    let content = fs::read_to_string(metadata_path)?;
    let document: Value = serde_json::from_str(&content)?;
    Ok(probe_title(&document, kind))
}

/// Probe the parsed descriptor for a title.
pub fn probe_title(document: &Value, kind: LayoutKind) -> Option<String> {
    let paths = match kind {
        LayoutKind::DesktopOrigin => DESKTOP_TITLE_PATHS,
        LayoutKind::MobileOrigin => MOBILE_TITLE_PATHS,
        LayoutKind::Unknown => return None,
    };

    paths
        .iter()
        .filter_map(|path| lookup_path(document, path))
        .find_map(|value| match value.as_str() {
            Some(s) if !s.is_empty() => Some(s.to_string()),
            _ => None,
        })
}

/// Resolve a dotted key path ("page_data.part") against a JSON document.
fn lookup_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |value, key| value.get(key))
}
