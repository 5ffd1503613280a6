//! Input folder layout detection and metadata access.

mod detector;
mod metadata;
mod scan;

pub use detector::{detect, DESKTOP_METADATA, MOBILE_DIR_PREFIX, MOBILE_METADATA};
pub use metadata::{extract_title, probe_title, MetadataError, MetadataResult};
pub use scan::{scan_candidates, CandidateFolder};
