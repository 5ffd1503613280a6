//! Output naming and external merge tool invocation.

mod ffmpeg;
mod naming;

pub use ffmpeg::{merge_streams, MergeError, MergeToolResult};
pub use naming::{sanitize_title, unique_output_path, FALLBACK_TITLE, MAX_TITLE_LEN};
