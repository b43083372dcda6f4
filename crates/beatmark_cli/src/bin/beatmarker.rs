//! Beat markers on host clips.
//!
//! Analyzes the backing audio file of a named clip in the host's media pool
//! and adds (or removes) one colored marker per detected beat, via the host
//! bridge configured in `[host]` settings.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use beatmark_cli::{init_logging, load_settings};
use beatmark_core::analysis::{AnalysisParams, BeatAnalyzer};
use beatmark_core::host::bridge::BridgeSession;
use beatmark_core::sync::MarkerSynchronizer;

/// Handle beat markers on clips in the editing host.
#[derive(Parser, Debug)]
#[command(name = "beatmarker", version)]
struct Args {
    /// Clip name, matched case-insensitively in the media pool root bin.
    #[arg(long)]
    clip: String,

    /// Marker color (defaults to the configured color, normally Yellow).
    #[arg(long)]
    color: Option<String>,

    /// What to do.
    #[arg(long, value_enum, ignore_case = true, default_value = "add")]
    command: Command,

    /// Path to a TOML settings file (created with defaults if absent).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Command {
    /// Analyze the clip and add one marker per beat.
    Add,
    /// Remove all markers of the color from the clip.
    Remove,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = load_settings(args.config.as_ref())?;
    init_logging(&settings);

    tracing::info!("starting beatmarker, v{}", beatmark_core::version());

    let color = args
        .color
        .unwrap_or_else(|| settings.markers.default_color.clone());

    let session = BridgeSession::spawn(
        &settings.host.bridge_command,
        &settings.host.bridge_args,
    )?;
    let analyzer = BeatAnalyzer::new(AnalysisParams::from(&settings.analysis));
    let sync = MarkerSynchronizer::new(&session, &analyzer);

    match args.command {
        Command::Add => {
            let report = sync.add_markers(&args.clip, &color)?;
            tracing::info!(
                "clip {}: {} markers added, {} failed, tempo {:.2} bpm",
                report.clip,
                report.added_count(),
                report.failed_frames().len(),
                report.tempo
            );
        }
        Command::Remove => {
            sync.remove_all(&args.clip, &color)?;
        }
    }

    Ok(())
}
