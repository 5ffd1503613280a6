use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use m4s_core::config::{FfmpegTool, Settings};
use m4s_core::layout;
use m4s_core::logging::{self, EventSink, LogEvent, LogLevel};
use m4s_core::orchestrator::MergeOrchestrator;

#[derive(Parser, Debug)]
#[command(name = "m4s-remux", version, about = "Repair and remux .m4s download fragments into MP4")]
struct Cli {
    #[arg(long, global = true, help = "Settings file (TOML)")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Verbose logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert one or more download folders into MP4 files.
    Convert {
        /// Download folders to process.
        #[arg(required = true)]
        folders: Vec<PathBuf>,

        /// Output directory for merged files (defaults to settings).
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Explicit ffmpeg binary (defaults to settings, then PATH).
        #[arg(long)]
        ffmpeg: Option<PathBuf>,
    },
    /// List recognizable download folders under a parent directory.
    Scan {
        /// Directory whose children are inspected.
        parent: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    logging::init_tracing(default_level);

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    match cli.command {
        Commands::Convert {
            folders,
            output_dir,
            ffmpeg,
        } => run_convert(settings, folders, output_dir, ffmpeg),
        Commands::Scan { parent } => run_scan(&parent),
    }
}

fn load_settings(path: Option<&std::path::Path>) -> anyhow::Result<Settings> {
    match path {
        Some(path) => Settings::load_or_default(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Ok(Settings::default()),
    }
}

fn run_convert(
    settings: Settings,
    folders: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
    ffmpeg: Option<PathBuf>,
) -> ExitCode {
    let explicit = ffmpeg.or_else(|| settings.paths.ffmpeg_path());
    let tool = match FfmpegTool::resolve(explicit.as_deref()) {
        Ok(tool) => tool,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    let output_dir =
        output_dir.unwrap_or_else(|| PathBuf::from(&settings.paths.output_folder));

    let orchestrator =
        MergeOrchestrator::new(tool, settings).with_event_sink(console_sink());
    let summary = orchestrator.process_batch(&folders, &output_dir);

    println!();
    for outcome in &summary.outcomes {
        match &outcome.result {
            Ok(success) => println!(
                "  ok    {} -> {}",
                outcome.folder.display(),
                success.output_path.display()
            ),
            Err(e) => println!("  fail  {} ({})", outcome.folder.display(), e),
        }
    }
    println!(
        "{} succeeded, {} failed",
        summary.succeeded(),
        summary.failed()
    );

    if summary.failed() > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn run_scan(parent: &std::path::Path) -> ExitCode {
    let candidates = layout::scan_candidates(parent);
    if candidates.is_empty() {
        println!("no recognizable download folders under {}", parent.display());
        return ExitCode::SUCCESS;
    }

    for candidate in &candidates {
        println!(
            "  {}  [{}]  {}",
            candidate.path.display(),
            candidate.kind,
            candidate.title.as_deref().unwrap_or("(no title)")
        );
    }
    println!("{} folder(s) found", candidates.len());
    ExitCode::SUCCESS
}

/// Plain console presentation of core events.
fn console_sink() -> EventSink {
    Arc::new(|event: &LogEvent| {
        if event.level >= LogLevel::Warn {
            eprintln!("{}", event.message);
        } else {
            println!("{}", event.message);
        }
    })
}
