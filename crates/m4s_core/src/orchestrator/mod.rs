//! Folder processing pipeline: detection, repair, merge, fallback.

mod errors;
mod processor;
mod state;

pub use errors::{ProcessError, ProcessResult};
pub use processor::{BatchSummary, FolderOutcome, MergeOrchestrator, MergeSuccess};
pub use state::MergeState;
