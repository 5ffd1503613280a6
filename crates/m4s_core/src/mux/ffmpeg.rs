//! External merge tool invocation.
//!
//! The core's entire dependency on ffmpeg is one capability: take two
//! input files, stream-copy both into one MP4 container, overwrite the
//! output if it exists, and report success through the exit status.
//! stderr is captured for diagnostics and fed to the folder logger's
//! tail buffer.

use std::io;
use std::path::Path;
use std::process::Command;

use thiserror::Error;

use crate::config::FfmpegTool;
use crate::logging::FolderLogger;

/// ffmpeg stderr marker that usually means a mangled or protected fragment.
const INVALID_DATA_MARKER: &str = "Invalid data found when processing input";

/// Failure of one merge attempt.
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("failed to launch {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("{tool} exited with code {exit_code}")]
    NonZeroExit { tool: String, exit_code: i32 },
}

/// Result type for merge invocations.
pub type MergeToolResult<T> = Result<T, MergeError>;

/// Stream-copy `video` and `audio` into `output`.
///
/// Blocks until the child process finishes. The invocation is exactly:
/// `ffmpeg -i <video> -i <audio> -c copy -y <output>`.
pub fn merge_streams(
    tool: &FfmpegTool,
    video: &Path,
    audio: &Path,
    output: &Path,
    logger: &FolderLogger,
) -> MergeToolResult<()> {
    let mut cmd = Command::new(tool.path());
    cmd.arg("-i")
        .arg(video)
        .arg("-i")
        .arg(audio)
        .arg("-c")
        .arg("copy")
        .arg("-y")
        .arg(output);

    logger.command(&format!(
        "{} -i {} -i {} -c copy -y {}",
        tool.display(),
        video.display(),
        audio.display(),
        output.display()
    ));

    logger.clear_tail();
    let result = cmd.output().map_err(|source| MergeError::Spawn {
        tool: tool.display(),
        source,
    })?;

    let stderr = String::from_utf8_lossy(&result.stderr);
    for line in stderr.lines() {
        logger.output_line(line, true);
    }

    if !result.status.success() {
        let exit_code = result.status.code().unwrap_or(-1);
        logger.show_tail("ffmpeg");
        if stderr.contains(INVALID_DATA_MARKER) {
            logger.warn(
                "ffmpeg reported invalid input data; the fragment may be \
                 incomplete, DRM-protected, or need header repair",
            );
        }
        return Err(MergeError::NonZeroExit {
            tool: tool.display(),
            exit_code,
        });
    }

    Ok(())
}
