//! Sequential batch analysis of input files.
//!
//! Input existence is validated up front, before any analysis begins; once
//! the batch is running, one file's failure is recorded and logged but never
//! prevents the remaining files from being attempted. Artifacts already
//! written stay on disk.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::analysis::{AnalysisError, AudioAnalyzer};
use crate::artifact::{self, ArtifactError};
use crate::models::{FileMarker, ImportFile};

/// Pre-flight batch errors.
#[derive(Error, Debug)]
pub enum BatchError {
    /// A requested input file does not exist. Carries the first missing
    /// path; reported before any analysis begins.
    #[error("file does not exist: {0}")]
    InputNotFound(PathBuf),
}

/// Failure of a single file inside a running batch.
#[derive(Error, Debug)]
pub enum FileError {
    /// Beat analysis failed for this file.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Writing this file's artifact failed.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

/// Outcome for one input file of a batch run.
#[derive(Debug)]
pub struct FileOutcome {
    /// The input file this outcome belongs to.
    pub file: ImportFile,
    /// The written marker on success, the per-file failure otherwise.
    pub result: Result<FileMarker, FileError>,
}

impl FileOutcome {
    /// Whether this file was processed successfully.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Validate input paths and build their [`ImportFile`] identities.
///
/// Fails with the first missing path, before any analysis begins.
pub fn parse_input_files<I, P>(paths: I) -> Result<Vec<ImportFile>, BatchError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut files = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(BatchError::InputNotFound(path.to_path_buf()));
        }
        files.push(ImportFile::from_path(path));
    }
    Ok(files)
}

/// Options for a batch run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Also emit the legacy `.bpm.yml` document per file.
    pub legacy_yaml: bool,
}

/// Runs beat analysis over a list of input files, one at a time.
pub struct BatchAnalyzer<'a> {
    analyzer: &'a dyn AudioAnalyzer,
    options: BatchOptions,
}

impl<'a> BatchAnalyzer<'a> {
    /// Create a batch runner over the given analyzer.
    pub fn new(analyzer: &'a dyn AudioAnalyzer, options: BatchOptions) -> Self {
        Self { analyzer, options }
    }

    /// Process every input strictly sequentially.
    ///
    /// Returns one outcome per input, in input order.
    pub fn run(&self, files: &[ImportFile]) -> Vec<FileOutcome> {
        let mut outcomes = Vec::with_capacity(files.len());

        for file in files {
            tracing::info!("process {}", file.path.display());

            let result = self.process_file(file);
            match &result {
                Ok(_) => tracing::debug!("processed {}", file.path.display()),
                Err(e) => tracing::error!("failed {}: {}", file.path.display(), e),
            }

            outcomes.push(FileOutcome {
                file: file.clone(),
                result,
            });
        }

        outcomes
    }

    fn process_file(&self, file: &ImportFile) -> Result<FileMarker, FileError> {
        let analysis = self.analyzer.analyze(&file.path)?;
        let marker = FileMarker::new(file.clone(), analysis.tempo, analysis.beat_frames);

        artifact::write_marker(&marker)?;
        if self.options.legacy_yaml {
            artifact::write_legacy_marker(&marker.file, marker.bpm)?;
        }

        Ok(marker)
    }
}
