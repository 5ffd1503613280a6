//! Per-folder merge orchestration and batch driving.
//!
//! One `process()` call handles one input folder, fully sequentially:
//! detect layout, load metadata, pick the track pair, then walk the
//! merge strategy chain until a terminal state. Per-folder errors are
//! converted into the folder's outcome and never abort the batch.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::{FfmpegTool, Settings};
use crate::layout;
use crate::logging::{EventSink, FolderLogger};
use crate::models::{FragmentFile, MergeStrategy, TrackPair};
use crate::mux::{self, FALLBACK_TITLE};
use crate::repair;
use crate::tracks;

use super::errors::{ProcessError, ProcessResult};
use super::state::MergeState;

/// Result of one successful folder merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSuccess {
    /// Final output artifact.
    pub output_path: PathBuf,
    /// Strategy that ultimately succeeded.
    pub strategy: MergeStrategy,
}

/// Outcome of processing one input folder.
#[derive(Debug)]
pub struct FolderOutcome {
    /// The input folder this outcome is for.
    pub folder: PathBuf,
    /// Success details or the last encountered failure reason.
    pub result: ProcessResult<MergeSuccess>,
}

impl FolderOutcome {
    /// Whether this folder merged successfully.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Human-readable failure reason, if the folder failed.
    pub fn failure_reason(&self) -> Option<String> {
        self.result.as_ref().err().map(|e| e.to_string())
    }
}

/// Aggregate result of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Per-folder outcomes, in submission order.
    pub outcomes: Vec<FolderOutcome>,
}

impl BatchSummary {
    pub fn new(outcomes: Vec<FolderOutcome>) -> Self {
        Self { outcomes }
    }

    /// Number of folders that merged successfully.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of folders that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Orchestrates detection, disambiguation, repair and merge per folder.
///
/// Holds the process-wide immutable pieces: the resolved merge tool,
/// settings, and the optional event sink that per-folder loggers feed.
pub struct MergeOrchestrator {
    ffmpeg: FfmpegTool,
    settings: Settings,
    sink: Option<EventSink>,
    temp_dir: Option<PathBuf>,
}

impl MergeOrchestrator {
    /// Create an orchestrator around a resolved merge tool.
    pub fn new(ffmpeg: FfmpegTool, settings: Settings) -> Self {
        Self {
            ffmpeg,
            settings,
            sink: None,
            temp_dir: None,
        }
    }

    /// Attach a subscriber for per-folder log events.
    pub fn with_event_sink(mut self, sink: EventSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Place repaired-fragment temp files under `dir` instead of the
    /// system temp directory.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Process one input folder into `output_dir`.
    pub fn process(&self, input_folder: &Path, output_dir: &Path) -> FolderOutcome {
        let folder_name = folder_display_name(input_folder);
        let logger = FolderLogger::new(&folder_name, self.settings.log_config(), self.sink.clone());

        logger.section(&format!("Processing {}", folder_name));
        let result = self.run(input_folder, output_dir, &logger);

        match &result {
            Ok(success) => logger.success(&format!(
                "{} -> {} ({})",
                folder_name,
                success.output_path.display(),
                success.strategy
            )),
            Err(e) => logger.error(&e.to_string()),
        }

        FolderOutcome {
            folder: input_folder.to_path_buf(),
            result,
        }
    }

    /// Process a batch of folders sequentially, in submission order.
    ///
    /// Each folder's outcome is independent; failures never stop the
    /// batch.
    pub fn process_batch(&self, folders: &[PathBuf], output_dir: &Path) -> BatchSummary {
        let mut outcomes = Vec::with_capacity(folders.len());
        for (i, folder) in folders.iter().enumerate() {
            tracing::info!(
                "processing folder {}/{}: {}",
                i + 1,
                folders.len(),
                folder.display()
            );
            outcomes.push(self.process(folder, output_dir));
        }

        let summary = BatchSummary::new(outcomes);
        tracing::info!(
            "batch finished: {} succeeded, {} failed",
            summary.succeeded(),
            summary.failed()
        );
        summary
    }

    /// The sequential per-folder pipeline.
    fn run(
        &self,
        input_folder: &Path,
        output_dir: &Path,
        logger: &FolderLogger,
    ) -> ProcessResult<MergeSuccess> {
        let detected = layout::detect(input_folder);
        let (fragment_dir, metadata_path) = match (&detected.fragment_dir, &detected.metadata_path)
        {
            (Some(f), Some(m)) if detected.is_known() => (f.clone(), m.clone()),
            _ => return Err(ProcessError::unrecognized_layout(input_folder.display())),
        };
        logger.info(&format!("detected {} layout", detected.kind));

        let raw_title = layout::extract_title(&metadata_path, detected.kind)
            .map_err(|e| ProcessError::metadata_unreadable(metadata_path.display(), e))?;
        let title = self.resolve_title(raw_title, input_folder, logger);
        logger.info(&format!("output title: {}", title));

        let pair = tracks::disambiguate(&fragment_dir, detected.kind)?;
        logger.info(&format!(
            "video: {} ({} bytes), audio: {} ({} bytes)",
            pair.primary.file_name(),
            pair.primary.size,
            pair.secondary.file_name(),
            pair.secondary.size
        ));

        fs::create_dir_all(output_dir)
            .map_err(|e| ProcessError::io("creating output directory", e))?;
        let output_path = mux::unique_output_path(output_dir, &title);
        logger.info(&format!("output file: {}", output_path.display()));

        // Walk the strategy chain to a terminal state.
        let mut state = MergeState::initial(detected.kind)
            .ok_or_else(|| ProcessError::unrecognized_layout(input_folder.display()))?;
        let mut last_error: Option<ProcessError> = None;

        while let Some(strategy) = state.strategy() {
            logger.section(&strategy.to_string());
            let attempt = match strategy {
                MergeStrategy::Direct => mux::merge_streams(
                    &self.ffmpeg,
                    &pair.primary.path,
                    &pair.secondary.path,
                    &output_path,
                    logger,
                )
                .map_err(ProcessError::from),
                MergeStrategy::RepairFirst => {
                    self.repair_and_merge(&pair, &output_path, logger)
                }
            };

            match attempt {
                Ok(()) => {
                    state = state.on_success();
                }
                Err(e) => {
                    state = state.on_failure();
                    if !state.is_terminal() {
                        logger.warn(&format!("{} failed, falling back: {}", strategy, e));
                    }
                    last_error = Some(e);
                }
            }

            if let MergeState::Done(strategy) = state {
                return Ok(MergeSuccess {
                    output_path,
                    strategy,
                });
            }
        }

        Err(last_error
            .unwrap_or_else(|| ProcessError::unrecognized_layout(input_folder.display())))
    }

    /// Repair both fragments into temp files, then merge the temp files.
    ///
    /// The temp files live only for this attempt; dropping the handles
    /// removes them on every exit path, success or failure.
    fn repair_and_merge(
        &self,
        pair: &TrackPair,
        output_path: &Path,
        logger: &FolderLogger,
    ) -> ProcessResult<()> {
        let video_tmp = self.repair_to_temp(&pair.primary, "repaired_vid_", logger)?;
        let audio_tmp = self.repair_to_temp(&pair.secondary, "repaired_aud_", logger)?;

        mux::merge_streams(
            &self.ffmpeg,
            video_tmp.path(),
            audio_tmp.path(),
            output_path,
            logger,
        )?;
        Ok(())
    }

    /// Run header repair on one fragment into a fresh temp file.
    fn repair_to_temp(
        &self,
        fragment: &FragmentFile,
        prefix: &str,
        logger: &FolderLogger,
    ) -> ProcessResult<NamedTempFile> {
        logger.info(&format!("repairing {}", fragment.file_name()));

        let input = File::open(&fragment.path)
            .map_err(|e| ProcessError::io("opening fragment for repair", e))?;
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix).suffix(".m4s");
        let mut tmp = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| ProcessError::io("creating temp file", e))?;

        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            let report = repair::repair_stream(BufReader::new(input), &mut writer, logger)?;
            writer
                .flush()
                .map_err(|e| ProcessError::io("flushing temp file", e))?;

            logger.debug(&format!(
                "{}: dropped {} header bytes, brand marker {}",
                fragment.file_name(),
                report.bytes_dropped,
                if report.brand_found { "present" } else { "absent" }
            ));
        }

        Ok(tmp)
    }

    /// Title fallback chain: descriptor title, folder name, fixed literal.
    fn resolve_title(
        &self,
        raw_title: Option<String>,
        input_folder: &Path,
        logger: &FolderLogger,
    ) -> String {
        if let Some(raw) = raw_title {
            let sanitized = mux::sanitize_title(&raw);
            if !sanitized.is_empty() {
                return sanitized;
            }
        }

        let from_folder = input_folder
            .file_name()
            .map(|n| mux::sanitize_title(&n.to_string_lossy()))
            .unwrap_or_default();
        if !from_folder.is_empty() {
            logger.warn("descriptor yielded no usable title, using folder name");
            return from_folder;
        }

        logger.warn("no usable title at all, using fixed fallback");
        FALLBACK_TITLE.to_string()
    }
}

/// Folder basename for logs and title fallback.
fn folder_display_name(folder: &Path) -> String {
    folder
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| folder.display().to_string())
}
