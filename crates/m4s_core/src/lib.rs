//! M4S Remux — core library.
//!
//! Repairs platform-mangled `.m4s` media fragments and remuxes each
//! video/audio pair into a playable MP4 via ffmpeg. The library is
//! UI-agnostic: all progress is reported through structured log events
//! that the embedding CLI or GUI subscribes to.
//!
//! Pipeline per input folder:
//! 1. [`layout`] recognizes the on-disk download layout and locates the
//!    metadata descriptor and fragment directory.
//! 2. [`tracks`] picks the video/audio pair from the fragments by size.
//! 3. [`repair`] strips the injected junk header bytes when needed.
//! 4. [`mux`] hands the pair to ffmpeg for a stream-copy merge.
//! 5. [`orchestrator`] drives the above and the direct-merge /
//!    repair-then-merge fallback chain.

pub mod config;
pub mod layout;
pub mod logging;
pub mod models;
pub mod mux;
pub mod orchestrator;
pub mod repair;
pub mod tracks;
