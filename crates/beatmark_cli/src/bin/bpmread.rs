//! Batch beat analysis.
//!
//! Reads beats per minute and beat positions from one or more audio files
//! and writes a `.bpm.json` sidecar artifact next to each input.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use beatmark_cli::{init_logging, load_settings};
use beatmark_core::analysis::{AnalysisParams, BeatAnalyzer};
use beatmark_core::batch::{parse_input_files, BatchAnalyzer, BatchOptions};

/// Tool to read beats per minute from a song.
#[derive(Parser, Debug)]
#[command(name = "bpmread", version)]
struct Args {
    /// Input audio files to analyze.
    #[arg(long = "input-file", required = true, num_args = 1..)]
    input_file: Vec<PathBuf>,

    /// Also write the legacy .bpm.yml document next to each input.
    #[arg(long)]
    legacy_yml: bool,

    /// Path to a TOML settings file (created with defaults if absent).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<bool> {
    let args = Args::parse();
    let settings = load_settings(args.config.as_ref())?;
    init_logging(&settings);

    tracing::info!("starting bpmread, v{}", beatmark_core::version());

    // Pre-flight: every input must exist before any analysis starts.
    let files = parse_input_files(&args.input_file)?;

    let analyzer = BeatAnalyzer::new(AnalysisParams::from(&settings.analysis));
    let options = BatchOptions {
        legacy_yaml: args.legacy_yml,
    };
    let outcomes = BatchAnalyzer::new(&analyzer, options).run(&files);

    let failed: Vec<_> = outcomes.iter().filter(|o| !o.is_ok()).collect();
    tracing::info!(
        "processed {} of {} files",
        outcomes.len() - failed.len(),
        outcomes.len()
    );
    for outcome in &failed {
        if let Err(e) = &outcome.result {
            tracing::error!("{}: {}", outcome.file.path.display(), e);
        }
    }

    Ok(failed.is_empty())
}
