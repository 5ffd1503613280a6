//! Byte-level repair of platform-mangled fragment headers.

mod header;

pub use header::{
    repair_stream, HeaderWarning, RepairError, RepairReport, RepairResult, COPY_BLOCK_LEN,
    HEADER_CHUNK_LEN,
};
