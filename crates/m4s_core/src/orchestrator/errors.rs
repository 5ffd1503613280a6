//! Per-folder error taxonomy.
//!
//! Every variant here is a per-folder failure: it is reported in that
//! folder's outcome and never aborts the batch. The only fatal error in
//! the crate is `config::ConfigurationError`, raised before processing
//! starts.

use std::io;

use thiserror::Error;

use crate::layout::MetadataError;
use crate::mux::MergeError;
use crate::repair::RepairError;
use crate::tracks::DisambiguateError;

/// Why processing one input folder failed.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The folder matches neither known layout.
    #[error("unrecognized folder layout: {path}")]
    UnrecognizedLayout { path: String },

    /// The metadata descriptor could not be read or parsed.
    #[error("metadata descriptor {path} unreadable: {source}")]
    MetadataUnreadable {
        path: String,
        #[source]
        source: MetadataError,
    },

    /// Track pair selection failed.
    #[error(transparent)]
    Disambiguate(#[from] DisambiguateError),

    /// Header repair hit an underlying I/O failure.
    #[error("header repair failed: {0}")]
    Repair(#[from] RepairError),

    /// The external merge tool failed or could not be launched.
    #[error(transparent)]
    ToolFailure(#[from] MergeError),

    /// Other file I/O around the merge (temp files, output directory).
    #[error("I/O error while {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl ProcessError {
    /// Create an unrecognized layout error.
    pub fn unrecognized_layout(path: impl std::fmt::Display) -> Self {
        Self::UnrecognizedLayout {
            path: path.to_string(),
        }
    }

    /// Create a metadata unreadable error.
    pub fn metadata_unreadable(path: impl std::fmt::Display, source: MetadataError) -> Self {
        Self::MetadataUnreadable {
            path: path.to_string(),
            source,
        }
    }

    /// Create an I/O error with operation context.
    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}

/// Result type for per-folder processing.
pub type ProcessResult<T> = Result<T, ProcessError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracks::DisambiguateError;

    #[test]
    fn errors_display_context() {
        let err = ProcessError::unrecognized_layout("/downloads/folder_x");
        assert!(err.to_string().contains("/downloads/folder_x"));

        let err = ProcessError::io(
            "creating output directory",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("creating output directory"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn disambiguate_error_converts() {
        let err: ProcessError = DisambiguateError::InsufficientFragments(1).into();
        assert!(err.to_string().contains("at least two"));
    }
}
