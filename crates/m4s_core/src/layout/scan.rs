//! Candidate folder scanning.
//!
//! Convenience for batch front-ends: given a parent directory, list the
//! immediate subfolders that detect as a known layout, with their probed
//! titles, so the caller can present them for selection.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::detector::detect;
use super::metadata::extract_title;
use crate::models::LayoutKind;

/// A subfolder that detected as a processable layout.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateFolder {
    /// Path to the subfolder.
    pub path: PathBuf,
    /// Detected layout kind (always a known kind).
    pub kind: LayoutKind,
    /// Title probed from the metadata descriptor, when readable.
    pub title: Option<String>,
}

/// Scan the immediate subfolders of `parent` for processable layouts.
///
/// Unreadable parents yield an empty list; unreadable descriptors leave
/// the candidate's title empty rather than dropping the candidate.
/// Results are sorted by folder name.
pub fn scan_candidates(parent: &Path) -> Vec<CandidateFolder> {
    let entries = match fs::read_dir(parent) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("failed to scan {}: {}", parent.display(), e);
            return Vec::new();
        }
    };

    let mut candidates: Vec<CandidateFolder> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter_map(|path| {
            let layout = detect(&path);
            if !layout.is_known() {
                return None;
            }
            let title = layout
                .metadata_path
                .as_deref()
                .and_then(|meta| extract_title(meta, layout.kind).ok())
                .flatten();
            Some(CandidateFolder {
                path,
                kind: layout.kind,
                title,
            })
        })
        .collect();

    candidates.sort_by(|a, b| a.path.cmp(&b.path));
    candidates
}
