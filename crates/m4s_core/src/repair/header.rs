//! Fragment header repair.
//!
//! The platform's download clients prepend junk bytes to each `.m4s`
//! fragment and corrupt a header length field, which keeps standard
//! tools from parsing the fragment. Repair undoes that mangling on the
//! first chunk of the stream and passes everything else through.

use std::io::{self, Read, Write};

use thiserror::Error;

use crate::logging::FolderLogger;

/// Bytes read for the first (header-bearing) chunk.
pub const HEADER_CHUNK_LEN: usize = 1024;

/// Block size for the pass-through copy after the header chunk.
pub const COPY_BLOCK_LEN: usize = 4096;

/// Leading junk bytes the platform prepends to each fragment.
const LEADING_JUNK_LEN: usize = 9;

/// Offset of the corrupted length/flags byte after the junk is stripped.
const PATCH_OFFSET: usize = 3;

/// Replacement value for the corrupted byte (ASCII space).
const PATCH_BYTE: u8 = 0x20;

/// Offset of the brand marker after the junk is stripped.
const BRAND_OFFSET: usize = 16;

/// Brand marker that, when present, means no extra bytes were inserted.
const BRAND_MARKER: &[u8; 4] = b"iso5";

/// I/O failure during repair.
///
/// Structural anomalies (short or truncated headers) are not errors;
/// they degrade gracefully and are recorded as warnings in the report.
#[derive(Error, Debug)]
pub enum RepairError {
    #[error("failed to read fragment: {0}")]
    Read(#[source] io::Error),

    #[error("failed to write repaired fragment: {0}")]
    Write(#[source] io::Error),
}

/// Result type for repair operations.
pub type RepairResult<T> = Result<T, RepairError>;

/// Structural warnings encountered while repairing a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderWarning {
    /// First chunk shorter than the 9-byte junk prefix; nothing stripped.
    TruncatedLead,
    /// Too few bytes left to patch the length/flags byte.
    TruncatedPatch,
    /// Too few bytes left to check the brand marker.
    TruncatedBrand,
}

impl std::fmt::Display for HeaderWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeaderWarning::TruncatedLead => {
                write!(f, "header shorter than junk prefix, written unchanged")
            }
            HeaderWarning::TruncatedPatch => {
                write!(f, "header too short to patch length byte")
            }
            HeaderWarning::TruncatedBrand => {
                write!(f, "header too short to check brand marker")
            }
        }
    }
}

/// What a repair pass did to the header chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Header bytes removed (9 for the junk prefix, +4 if the inserted
    /// segment was stripped, 0 in the degenerate short-header case).
    pub bytes_dropped: usize,
    /// Whether the `iso5` brand marker was found at its expected offset.
    pub brand_found: bool,
    /// Structural anomalies encountered (best-effort, non-fatal).
    pub warnings: Vec<HeaderWarning>,
}

/// Repair a fragment stream into `writer`.
///
/// Reads the first chunk (up to [`HEADER_CHUNK_LEN`] bytes, tolerating
/// any shorter length), applies the header transform to it, then copies
/// the remainder unchanged in [`COPY_BLOCK_LEN`] blocks.
///
/// Only I/O failures return an error; every short-header condition is a
/// logged warning and the stream is still written out.
pub fn repair_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    logger: &FolderLogger,
) -> RepairResult<RepairReport> {
    let mut report = RepairReport::default();

    let mut chunk = vec![0u8; HEADER_CHUNK_LEN];
    let filled = read_up_to(&mut reader, &mut chunk).map_err(RepairError::Read)?;
    chunk.truncate(filled);

    if chunk.len() < LEADING_JUNK_LEN {
        // Degenerate case: the whole fragment is shorter than the junk
        // prefix. Write it unchanged and skip the remaining steps.
        warn(&mut report, logger, HeaderWarning::TruncatedLead);
        writer.write_all(&chunk).map_err(RepairError::Write)?;
        copy_remainder(&mut reader, &mut writer)?;
        return Ok(report);
    }

    chunk.drain(..LEADING_JUNK_LEN);
    report.bytes_dropped = LEADING_JUNK_LEN;

    if chunk.len() > PATCH_OFFSET {
        chunk[PATCH_OFFSET] = PATCH_BYTE;
    } else {
        warn(&mut report, logger, HeaderWarning::TruncatedPatch);
    }

    if chunk.len() >= BRAND_OFFSET + BRAND_MARKER.len() {
        if &chunk[BRAND_OFFSET..BRAND_OFFSET + BRAND_MARKER.len()] == BRAND_MARKER {
            report.brand_found = true;
        } else {
            // No brand marker: the platform inserted a spurious 4-byte
            // segment here. Strip it.
            chunk.drain(BRAND_OFFSET..BRAND_OFFSET + BRAND_MARKER.len());
            report.bytes_dropped += BRAND_MARKER.len();
        }
    } else if chunk.len() > BRAND_OFFSET {
        warn(&mut report, logger, HeaderWarning::TruncatedBrand);
    }

    writer.write_all(&chunk).map_err(RepairError::Write)?;
    copy_remainder(&mut reader, &mut writer)?;

    Ok(report)
}

/// Fill `buf` from the reader until full or EOF; returns bytes read.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Copy the rest of the stream unchanged in fixed-size blocks.
fn copy_remainder<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> RepairResult<()> {
    let mut block = vec![0u8; COPY_BLOCK_LEN];
    loop {
        let n = read_up_to(reader, &mut block).map_err(RepairError::Read)?;
        if n == 0 {
            return Ok(());
        }
        writer.write_all(&block[..n]).map_err(RepairError::Write)?;
    }
}

fn warn(report: &mut RepairReport, logger: &FolderLogger, warning: HeaderWarning) {
    logger.warn(&warning.to_string());
    report.warnings.push(warning);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogConfig;

    fn test_logger() -> FolderLogger {
        FolderLogger::new("repair_test", LogConfig::default(), None)
    }

    /// Build a header whose post-strip bytes 16..20 hold `brand`.
    fn fragment_with_brand(brand: &[u8; 4], total_len: usize) -> Vec<u8> {
        assert!(total_len >= LEADING_JUNK_LEN + BRAND_OFFSET + 4);
        let mut data: Vec<u8> = (0..total_len).map(|i| (i % 251) as u8).collect();
        let start = LEADING_JUNK_LEN + BRAND_OFFSET;
        data[start..start + 4].copy_from_slice(brand);
        data
    }

    fn repair_bytes(input: &[u8]) -> (Vec<u8>, RepairReport) {
        let mut out = Vec::new();
        let report = repair_stream(input, &mut out, &test_logger()).unwrap();
        (out, report)
    }

    #[test]
    fn brand_present_drops_nine_bytes() {
        let input = fragment_with_brand(b"iso5", 64);
        let (out, report) = repair_bytes(&input);

        assert_eq!(out.len(), input.len() - 9);
        assert!(report.brand_found);
        assert_eq!(report.bytes_dropped, 9);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn brand_absent_drops_thirteen_bytes() {
        let input = fragment_with_brand(b"XXXX", 64);
        let (out, report) = repair_bytes(&input);

        assert_eq!(out.len(), input.len() - 13);
        assert!(!report.brand_found);
        assert_eq!(report.bytes_dropped, 13);
    }

    #[test]
    fn patch_byte_is_applied() {
        let input = fragment_with_brand(b"iso5", 64);
        let (out, _) = repair_bytes(&input);
        assert_eq!(out[PATCH_OFFSET], PATCH_BYTE);
    }

    #[test]
    fn brand_absent_shifts_following_bytes_left() {
        let mut input = fragment_with_brand(b"XXXX", 64);
        // Mark the byte right after the inserted segment.
        input[LEADING_JUNK_LEN + BRAND_OFFSET + 4] = 0xAB;
        let (out, _) = repair_bytes(&input);
        assert_eq!(out[BRAND_OFFSET], 0xAB);
    }

    #[test]
    fn tail_is_copied_unchanged() {
        // Header chunk plus a tail bigger than one copy block.
        let mut input = fragment_with_brand(b"iso5", HEADER_CHUNK_LEN);
        let tail: Vec<u8> = (0..COPY_BLOCK_LEN + 100).map(|i| (i % 7) as u8).collect();
        input.extend_from_slice(&tail);

        let (out, _) = repair_bytes(&input);
        assert_eq!(&out[out.len() - tail.len()..], &tail[..]);
        assert_eq!(out.len(), input.len() - 9);
    }

    #[test]
    fn short_chunks_never_fail() {
        // Boundary lengths from the repair contract.
        for len in [0usize, 5, 9, 10, 16, 19, 20] {
            let input: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let mut out = Vec::new();
            let report = repair_stream(&input[..], &mut out, &test_logger()).unwrap();

            if len < 9 {
                // Degenerate case: written unchanged.
                assert_eq!(out, input, "len {}", len);
                assert_eq!(report.bytes_dropped, 0);
                assert!(report.warnings.contains(&HeaderWarning::TruncatedLead));
            } else {
                assert_eq!(out.len(), len - 9, "len {}", len);
            }
        }
    }

    #[test]
    fn chunk_of_exactly_nine_warns_on_patch() {
        let input = vec![0u8; 9];
        let (out, report) = repair_bytes(&input);
        assert!(out.is_empty());
        assert!(report.warnings.contains(&HeaderWarning::TruncatedPatch));
    }

    #[test]
    fn chunk_between_brand_offsets_warns() {
        // 9 junk + 18 payload: enough to reach offset 16 but not 20.
        let input = vec![0u8; 27];
        let (out, report) = repair_bytes(&input);
        assert_eq!(out.len(), 18);
        assert!(report.warnings.contains(&HeaderWarning::TruncatedBrand));
    }

    #[test]
    fn write_failure_is_an_error() {
        struct FailWriter;
        impl Write for FailWriter {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disk full"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let input = fragment_with_brand(b"iso5", 64);
        let result = repair_stream(&input[..], FailWriter, &test_logger());
        assert!(matches!(result, Err(RepairError::Write(_))));
    }
}
