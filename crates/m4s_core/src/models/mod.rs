//! Core data model shared across the crate.

mod enums;
mod media;

pub use enums::{LayoutKind, MergeStrategy};
pub use media::{is_fragment_file, DetectedLayout, FragmentFile, TrackPair};
